//! Stream Context - 签名解密
//!
//! 上游对部分流只下发 `signatureCipher`（`s`、`sp`、`url` 三个查询参数）。
//! 真实签名 = 对 `s` 依次执行播放器脚本中的一组变换（反转、截断、交换）。
//!
//! 这里只包含纯逻辑：解析密文、从播放器脚本中提取变换程序、执行变换。
//! 网络部分（获取播放器脚本）在 infrastructure 层的 decipher 适配器中。

use regex::Regex;
use url::Url;

use super::errors::CipherError;

/// 默认签名参数名
const DEFAULT_SIGNATURE_PARAM: &str = "signature";

/// 解密函数体：`xx=function(a){a=a.split("");...;return a.join("")}`
const DECIPHER_BODY_PATTERN: &str =
    r#"=function\(a\)\{a=a\.split\(""\);([^}]+?)return a\.join\(""\)\}"#;

/// 解密函数体中对辅助对象的调用：`Xy.ab(a,3)`
const HELPER_CALL_PATTERN: &str = r"([a-zA-Z0-9$_]+)\.([a-zA-Z0-9$_]+)\(a,(\d+)\)";

/// 辅助对象中的方法定义：`ab:function(a,b){...}`
const HELPER_METHOD_PATTERN: &str = r"([a-zA-Z0-9$_]+):function\(a(?:,b)?\)\{([^}]*)\}";

/// 单个签名变换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherOperation {
    Reverse,
    /// 删除前 n 个字符
    Splice(usize),
    /// 交换第 0 个和第 n % len 个字符
    Swap(usize),
}

impl CipherOperation {
    fn apply(self, chars: &mut Vec<char>) {
        match self {
            CipherOperation::Reverse => chars.reverse(),
            CipherOperation::Splice(n) => {
                let n = n.min(chars.len());
                chars.drain(..n);
            }
            CipherOperation::Swap(n) => {
                if !chars.is_empty() {
                    let idx = n % chars.len();
                    chars.swap(0, idx);
                }
            }
        }
    }
}

/// 从播放器脚本中提取出的变换程序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherProgram {
    operations: Vec<CipherOperation>,
}

impl CipherProgram {
    pub fn new(operations: Vec<CipherOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[CipherOperation] {
        &self.operations
    }

    /// 解析播放器脚本
    pub fn from_player_script(script: &str) -> Result<Self, CipherError> {
        let body_re = compile(DECIPHER_BODY_PATTERN)?;
        let body = body_re
            .captures(script)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| CipherError::PlayerScript("decipher function not found".to_string()))?;

        let call_re = compile(HELPER_CALL_PATTERN)?;
        let calls: Vec<(&str, &str, usize)> = call_re
            .captures_iter(body)
            .filter_map(|c| {
                let object = c.get(1)?.as_str();
                let method = c.get(2)?.as_str();
                let arg = c.get(3)?.as_str().parse().ok()?;
                Some((object, method, arg))
            })
            .collect();

        let helper_name = match calls.first() {
            Some((object, _, _)) => *object,
            None => return Ok(Self::default()),
        };

        let helper_re = compile(&format!(
            r"(?s)var {}=\{{(.*?)\}};",
            regex::escape(helper_name)
        ))?;
        let helper_body = helper_re
            .captures(script)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                CipherError::PlayerScript(format!("helper object {} not found", helper_name))
            })?;

        let method_re = compile(HELPER_METHOD_PATTERN)?;
        let methods: Vec<(&str, &str)> = method_re
            .captures_iter(helper_body)
            .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect();

        let mut operations = Vec::with_capacity(calls.len());
        for (object, method, arg) in calls {
            if object != helper_name {
                return Err(CipherError::PlayerScript(format!(
                    "unexpected helper object {}",
                    object
                )));
            }
            let (_, method_body) = methods
                .iter()
                .find(|(name, _)| *name == method)
                .ok_or_else(|| {
                    CipherError::PlayerScript(format!("helper method {} not found", method))
                })?;
            operations.push(classify(method_body, arg)?);
        }

        Ok(Self { operations })
    }

    /// 对签名执行变换
    pub fn decipher(&self, signature: &str) -> String {
        let mut chars: Vec<char> = signature.chars().collect();
        for op in &self.operations {
            op.apply(&mut chars);
        }
        chars.into_iter().collect()
    }
}

fn classify(method_body: &str, arg: usize) -> Result<CipherOperation, CipherError> {
    if method_body.contains("reverse") {
        Ok(CipherOperation::Reverse)
    } else if method_body.contains("splice") {
        Ok(CipherOperation::Splice(arg))
    } else if method_body.contains("a[0]") {
        Ok(CipherOperation::Swap(arg))
    } else {
        Err(CipherError::PlayerScript(format!(
            "unknown transform: {}",
            method_body
        )))
    }
}

fn compile(pattern: &str) -> Result<Regex, CipherError> {
    Regex::new(pattern).map_err(|e| CipherError::PlayerScript(e.to_string()))
}

/// 上游下发的签名密文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCipher {
    /// 加密的签名（`s`）
    pub signature: String,
    /// 签名参数名（`sp`，默认 `signature`）
    pub signature_param: String,
    /// 不带签名的流地址（`url`）
    pub url: String,
}

impl SignatureCipher {
    /// 解析 `s=...&sp=...&url=...` 形式的密文
    pub fn parse(token: &str) -> Result<Self, CipherError> {
        let mut signature = None;
        let mut signature_param = None;
        let mut url = None;

        for (key, value) in url::form_urlencoded::parse(token.as_bytes()) {
            match key.as_ref() {
                "s" => signature = Some(value.into_owned()),
                "sp" => signature_param = Some(value.into_owned()),
                "url" => url = Some(value.into_owned()),
                _ => {}
            }
        }

        let signature = signature
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CipherError::InvalidToken("missing signature".to_string()))?;
        let url = url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CipherError::InvalidToken("missing url".to_string()))?;

        Ok(Self {
            signature,
            signature_param: signature_param
                .filter(|sp| !sp.is_empty())
                .unwrap_or_else(|| DEFAULT_SIGNATURE_PARAM.to_string()),
            url,
        })
    }

    /// 用变换程序还原签名并拼出可播放 URL
    pub fn to_url(&self, program: &CipherProgram) -> Result<Url, CipherError> {
        let mut url =
            Url::parse(&self.url).map_err(|e| CipherError::InvalidUrl(e.to_string()))?;
        let signature = program.decipher(&self.signature);
        url.query_pairs_mut()
            .append_pair(&self.signature_param, &signature);
        Ok(url)
    }
}
