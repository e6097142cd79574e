//! 异步缓存回写队列
//!
//! 新翻译的短语通过一个有界队列交给后台消费者写回缓存，请求路径只做非阻塞入队。
//! 队列满时丢弃该批次并记录警告，以保护响应延迟；丢失的只是缓存写入，
//! 下次遇到相同短语会重新翻译。
//!
//! 消费者每取出一个批次就启动一个写入任务，并发数受信号量限制。
//! 关闭后不再接受入队，正在进行的写入可能被放弃。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, Notify, Semaphore};
use tokio::task::JoinHandle;

use crate::translation::config::constants;
use crate::translation::model::PhraseRecord;
use crate::translation::storage::cache::PhraseCache;

/// 回写队列配置
#[derive(Debug, Clone)]
pub struct WriteBackConfig {
    /// 队列最多容纳的待写批次数
    pub capacity: usize,
    /// 同时进行的写入任务上限
    pub max_concurrent_writes: usize,
}

impl Default for WriteBackConfig {
    fn default() -> Self {
        Self {
            capacity: constants::DEFAULT_WRITEBACK_CAPACITY,
            max_concurrent_writes: constants::DEFAULT_WRITEBACK_CONCURRENCY,
        }
    }
}

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// 批次为空，无需写入
    Empty,
    /// 队列已满，批次被丢弃
    DroppedFull,
    /// 队列已关闭，批次被丢弃
    DroppedClosed,
}

/// 回写统计快照
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WriteBackStats {
    pub enqueued: u64,
    pub dropped: u64,
    pub batches_written: u64,
    pub phrases_written: u64,
}

#[derive(Debug, Default)]
struct Counters {
    enqueued: AtomicU64,
    dropped: AtomicU64,
    batches_written: AtomicU64,
    phrases_written: AtomicU64,
}

/// 回写队列句柄，可克隆，所有克隆共享同一个队列
#[derive(Clone)]
pub struct WriteBackQueue {
    sender: mpsc::Sender<Vec<PhraseRecord>>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    consumer: Arc<Mutex<Option<JoinHandle<()>>>>,
    counters: Arc<Counters>,
}

impl WriteBackQueue {
    /// 创建队列并启动后台消费者，必须在 tokio 运行时内调用
    pub fn spawn(cache: PhraseCache, config: WriteBackConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let shutdown = Arc::new(Notify::new());
        let counters = Arc::new(Counters::default());
        let limiter = Arc::new(Semaphore::new(config.max_concurrent_writes.max(1)));

        let consumer = tokio::spawn(run_consumer(
            receiver,
            cache,
            limiter,
            Arc::clone(&shutdown),
            Arc::clone(&counters),
        ));

        tracing::info!(
            "缓存回写队列已启动: 容量 {}, 并发 {}",
            config.capacity,
            config.max_concurrent_writes
        );

        Self {
            sender,
            closed: Arc::new(AtomicBool::new(false)),
            shutdown,
            consumer: Arc::new(Mutex::new(Some(consumer))),
            counters,
        }
    }

    /// 非阻塞入队
    pub fn enqueue(&self, batch: Vec<PhraseRecord>) -> EnqueueOutcome {
        if batch.is_empty() {
            return EnqueueOutcome::Empty;
        }

        if self.closed.load(Ordering::Acquire) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("回写队列已关闭，丢弃 {} 条短语", batch.len());
            return EnqueueOutcome::DroppedClosed;
        }

        let size = batch.len();
        match self.sender.try_send(batch) {
            Ok(()) => {
                self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
                EnqueueOutcome::Queued
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("回写队列已满，丢弃 {} 条短语", size);
                EnqueueOutcome::DroppedFull
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("回写消费者已退出，丢弃 {} 条短语", size);
                EnqueueOutcome::DroppedClosed
            }
        }
    }

    /// 是否已关闭
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 关闭队列并等待消费者退出
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown.notify_one();

        let handle = self.consumer.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("回写消费者异常退出: {}", e);
            }
        }

        tracing::info!("缓存回写队列已关闭");
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> WriteBackStats {
        WriteBackStats {
            enqueued: self.counters.enqueued.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            batches_written: self.counters.batches_written.load(Ordering::Relaxed),
            phrases_written: self.counters.phrases_written.load(Ordering::Relaxed),
        }
    }
}

async fn run_consumer(
    mut receiver: mpsc::Receiver<Vec<PhraseRecord>>,
    cache: PhraseCache,
    limiter: Arc<Semaphore>,
    shutdown: Arc<Notify>,
    counters: Arc<Counters>,
) {
    loop {
        let batch = tokio::select! {
            _ = shutdown.notified() => break,
            batch = receiver.recv() => match batch {
                Some(batch) => batch,
                None => break,
            },
        };

        let permit = tokio::select! {
            _ = shutdown.notified() => break,
            permit = Arc::clone(&limiter).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let cache = cache.clone();
        let counters = Arc::clone(&counters);
        tokio::spawn(async move {
            let pairs: Vec<(String, String)> = batch
                .into_iter()
                .map(|record| (record.fingerprint, record.target))
                .collect();

            let written = cache.bulk_set(&pairs).await;
            counters.batches_written.fetch_add(1, Ordering::Relaxed);
            counters
                .phrases_written
                .fetch_add(written as u64, Ordering::Relaxed);

            tracing::debug!("回写缓存: {}/{} 条", written, pairs.len());
            drop(permit);
        });
    }

    receiver.close();
    tracing::debug!("回写消费者退出");
}
