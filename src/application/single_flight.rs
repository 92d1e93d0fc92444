//! Single-flight - 合并并发的相同请求
//!
//! 同一 key 的并发调用共享一次进行中的 future，只有第一个调用者真正发起上游请求。
//! 登记表只持有弱引用：最后一个等待者离开（完成或被取消）时登记项被移除，
//! 之后的调用重新执行。

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};

type SharedTask<T> = Shared<BoxFuture<'static, T>>;

/// 登记项：代次号 + 共享 future 的弱引用
struct Flight<T>
where
    T: Clone + Send + Sync + 'static,
{
    generation: u64,
    task: Option<WeakShared<BoxFuture<'static, T>>>,
}

impl<T> Flight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn upgrade(&self) -> Option<SharedTask<T>> {
        self.task.as_ref().and_then(WeakShared::upgrade)
    }
}

/// 进行中的请求登记表
pub struct SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    in_flight: DashMap<String, Flight<T>>,
    next_generation: AtomicU64,
}

/// 单个等待者；drop 时若自己是最后一个持有者则移除登记项
struct Waiter<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    in_flight: &'a DashMap<String, Flight<T>>,
    key: &'a str,
    generation: u64,
    task: SharedTask<T>,
}

impl<T> Drop for Waiter<'_, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        // 在分片锁内判断，避免与并发 upgrade 竞争；strong_count 为 None 表示已完成
        let generation = self.generation;
        let task = &self.task;
        self.in_flight.remove_if(self.key, |_, flight| {
            flight.generation == generation
                && task.strong_count().map_or(true, |count| count <= 1)
        });
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }

    /// 执行或加入 key 对应的请求
    ///
    /// `make` 只在当前没有进行中的请求时被调用。
    /// 所有等待者都被取消时，共享的 future 随之释放，登记项一并移除。
    pub async fn run<F, Fut>(&self, key: &str, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (generation, task) = self.join_or_start(key, make);

        let mut waiter = Waiter {
            in_flight: &self.in_flight,
            key,
            generation,
            task,
        };

        (&mut waiter.task).await
    }

    fn join_or_start<F, Fut>(&self, key: &str, make: F) -> (u64, SharedTask<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        // 注意: entry 持有分片锁，必须在 await 之前释放
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if let Some(task) = entry.get().upgrade() {
                    return (entry.get().generation, task);
                }
                let (flight, task) = self.start(make);
                let generation = flight.generation;
                entry.insert(flight);
                (generation, task)
            }
            Entry::Vacant(entry) => {
                let (flight, task) = self.start(make);
                let generation = flight.generation;
                entry.insert(flight);
                (generation, task)
            }
        }
    }

    fn start<F, Fut>(&self, make: F) -> (Flight<T>, SharedTask<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let task = make().boxed().shared();
        let flight = Flight {
            generation,
            task: task.downgrade(),
        };
        (flight, task)
    }

    /// 当前进行中的 key 数量
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
