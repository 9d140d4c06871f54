//! 后台分割任务, 以及结果向共享显示状态的交接.
//!
//! 交互端每次操作提交一个 [`SegmentRequest`] (图像与种子的不可变快照) 给
//! [`SegmentWorker`]. 新的提交会取消仍在运行的旧任务; 结果只写入
//! [`LabelSink`] 一次, 且只接受比当前更新的代次 (last-writer-wins),
//! 两次运行的结果永远不会被混合.

use crate::engine::{segment_cancellable, Segmentation};
use crate::error::SegmentError;
use crate::params::SegmentParams;
use crate::SegResult;
use ndarray::ArrayD;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// 协作式取消标志. 克隆后共享同一标志.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// 创建未取消的标志.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消. 不可撤销.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// 是否已请求取消.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// 一次分割请求: 图像、种子与参数的不可变快照.
///
/// 快照在提交时就已固定, 运行中的任务不会观察到用户随后对种子层的编辑.
#[derive(Clone, Debug)]
pub struct SegmentRequest {
    image: Arc<ArrayD<f64>>,
    seeds: Arc<ArrayD<u32>>,
    params: SegmentParams,
}

impl SegmentRequest {
    /// 创建请求. 形状不一致或参数非法时立即返回错误.
    pub fn new(
        image: Arc<ArrayD<f64>>,
        seeds: Arc<ArrayD<u32>>,
        params: SegmentParams,
    ) -> SegResult<Self> {
        if image.shape() != seeds.shape() {
            return Err(SegmentError::ShapeMismatch(
                image.shape().to_vec(),
                seeds.shape().to_vec(),
            ));
        }
        params.validate()?;
        Ok(Self {
            image,
            seeds,
            params,
        })
    }

    /// 从可能缺失的图层创建请求. 任一图层缺失时返回 [`SegmentError::MissingInput`].
    pub fn from_layers(
        image: Option<Arc<ArrayD<f64>>>,
        seeds: Option<Arc<ArrayD<u32>>>,
        params: SegmentParams,
    ) -> SegResult<Self> {
        let image = image.ok_or(SegmentError::MissingInput("image"))?;
        let seeds = seeds.ok_or(SegmentError::MissingInput("seeds"))?;
        Self::new(image, seeds, params)
    }

    /// 在当前线程上运行.
    #[inline]
    pub fn run(&self, cancel: &CancelToken) -> SegResult<Segmentation> {
        segment_cancellable(self.image.view(), self.seeds.view(), &self.params, cancel)
    }

    /// 图像快照.
    #[inline]
    pub fn image(&self) -> &Arc<ArrayD<f64>> {
        &self.image
    }

    /// 种子快照.
    #[inline]
    pub fn seeds(&self) -> &Arc<ArrayD<u32>> {
        &self.seeds
    }

    /// 参数.
    #[inline]
    pub fn params(&self) -> &SegmentParams {
        &self.params
    }
}

/// 提交凭据, 即该次提交的代次. 代次严格递增.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// 代次.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// 交付给显示层的结果.
pub type Published = Result<Arc<ArrayD<u32>>, SegmentError>;

#[derive(Default)]
struct SinkState {
    generation: u64,
    result: Option<Published>,
}

/// 显示层共享的输出目标. 只有持有锁的极短时间内才会被修改.
#[derive(Default)]
pub struct LabelSink {
    state: Mutex<SinkState>,
    updated: Condvar,
}

impl LabelSink {
    /// 创建空的输出目标.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 写入 `ticket` 对应的结果. 若已有同代或更新代次的结果, 则丢弃并返回 `false`.
    pub fn publish(&self, ticket: Ticket, result: Published) -> bool {
        let mut state = self.lock();
        if ticket.0 <= state.generation {
            return false;
        }
        state.generation = ticket.0;
        state.result = Some(result);
        drop(state);
        self.updated.notify_all();
        true
    }

    /// 当前结果的代次. 尚无结果时为 0.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// 最近一次成功的标签图.
    pub fn latest(&self) -> Option<Arc<ArrayD<u32>>> {
        match &self.lock().result {
            Some(Ok(labels)) => Some(Arc::clone(labels)),
            _ => None,
        }
    }

    /// 阻塞直到 `ticket` 或更新的结果被写入.
    ///
    /// 若先到达的是更新的代次, 说明 `ticket` 已被替代, 返回 [`SegmentError::Cancelled`].
    pub fn wait_for(&self, ticket: Ticket) -> Published {
        let state = self
            .updated
            .wait_while(self.lock(), |s| s.generation < ticket.0)
            .unwrap_or_else(PoisonError::into_inner);
        match &state.result {
            Some(result) if state.generation == ticket.0 => result.clone(),
            _ => Err(SegmentError::Cancelled),
        }
    }
}

struct Job {
    ticket: Ticket,
    request: SegmentRequest,
    cancel: CancelToken,
}

/// 专用的后台分割线程.
///
/// 同一时刻至多一个任务在运行. 析构时关闭任务通道并等待线程退出.
pub struct SegmentWorker {
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
    sink: Arc<LabelSink>,
    generation: u64,
    in_flight: Option<CancelToken>,
}

impl SegmentWorker {
    /// 启动后台线程, 结果写入 `sink`.
    pub fn spawn(sink: Arc<LabelSink>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker_sink = Arc::clone(&sink);
        let handle = thread::Builder::new()
            .name("seg-worker".to_string())
            .spawn(move || work_loop(&rx, &worker_sink))?;
        let generation = sink.generation();
        Ok(Self {
            jobs: Some(tx),
            handle: Some(handle),
            sink,
            generation,
            in_flight: None,
        })
    }

    /// 提交请求, 并取消仍在运行的上一个任务.
    pub fn submit(&mut self, request: SegmentRequest) -> Ticket {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel();
        }
        self.generation += 1;
        let ticket = Ticket(self.generation);
        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());

        let job = Job {
            ticket,
            request,
            cancel,
        };
        let sent = self.jobs.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if !sent {
            log::error!("Segmentation worker is gone, request {} dropped", ticket.0);
            self.sink.publish(ticket, Err(SegmentError::Cancelled));
        }
        ticket
    }

    /// 提交请求并等待其结果.
    pub fn run_blocking(&mut self, request: SegmentRequest) -> Published {
        let ticket = self.submit(request);
        self.sink.wait_for(ticket)
    }

    /// 结果输出目标.
    #[inline]
    pub fn sink(&self) -> &Arc<LabelSink> {
        &self.sink
    }
}

impl Drop for SegmentWorker {
    fn drop(&mut self) {
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Segmentation worker panicked");
            }
        }
    }
}

fn work_loop(jobs: &Receiver<Job>, sink: &LabelSink) {
    while let Ok(mut job) = jobs.recv() {
        // 积压的请求只保留最新的一个.
        while let Ok(newer) = jobs.try_recv() {
            job = newer;
        }
        if job.cancel.is_cancelled() {
            continue;
        }

        execute(job, sink, SegmentRequest::run);
    }
}

/// panic 负载中的信息.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 以 `run` 执行任务并写入结果. 返回结果是否被 `sink` 接受.
///
/// 除取消外, 每个任务都会写入一个结果, `run` panic 时写入
/// [`SegmentError::Aborted`], 因此等待该任务的调用方总会被唤醒.
fn execute<F>(job: Job, sink: &LabelSink, run: F) -> bool
where
    F: FnOnce(&SegmentRequest, &CancelToken) -> SegResult<Segmentation>,
{
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(&job.request, &job.cancel)))
        .unwrap_or_else(|payload| Err(SegmentError::Aborted(panic_message(&*payload))));
    match outcome {
        Ok(seg) => {
            log::info!(
                "Request {} done in {} ms ({} unreached)",
                job.ticket.0,
                start.elapsed().as_millis(),
                seg.unreached()
            );
            sink.publish(job.ticket, Ok(Arc::new(seg.into_labels())))
        }
        Err(SegmentError::Cancelled) => {
            log::debug!("Request {} cancelled", job.ticket.0);
            false
        }
        Err(e) => {
            log::error!("Request {} failed: {e}", job.ticket.0);
            sink.publish(job.ticket, Err(e))
        }
    }
}
