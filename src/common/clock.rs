//! フレームクロック
//!
//! 「次のフレームでコールバックを呼ぶ」「取り消す」を抽象化したもの。
//! 実時間で動く `SystemClock` と、テスト用に手動で進める `ManualClock` がある。
//! どちらも要求したフレームを溜めておき、期限が来たものを `take_due` で返す。

use std::time::{Duration, Instant};

/// 予約したフレームの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameClock {
    /// クロック起点からの経過時間
    fn now(&self) -> Duration;

    /// 次のフレームを予約する
    fn request_frame(&mut self) -> FrameHandle;

    /// 予約を取り消す。未知のハンドルや発火済みのハンドルでは何もしない
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// 期限が来たフレームを1つ取り出す
    fn take_due(&mut self) -> Option<FrameHandle>;
}

/// 予約済みフレームの待ち行列
#[derive(Debug, Default)]
struct FrameQueue {
    next_id: u64,
    pending: Vec<(FrameHandle, Duration)>,
}

impl FrameQueue {
    fn request(&mut self, due: Duration) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((handle, due));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }

    fn take_due(&mut self, now: Duration) -> Option<FrameHandle> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= now)
            .min_by_key(|(_, (_, due))| *due)
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).0)
    }
}

/// now より後で最初に来るフレーム境界（起点 + k·interval）
///
/// 描画に時間がかかっても次の期限が後ろにずれないよう、期限は格子に揃える。
pub fn next_frame_boundary(now: Duration, interval: Duration) -> Duration {
    let step = interval.as_nanos();
    if step == 0 {
        return now;
    }
    let k = now.as_nanos() / step + 1;
    Duration::from_nanos(u64::try_from(k * step).unwrap_or(u64::MAX))
}

/// `Instant` で動く実時間クロック。フレームは次のフレーム境界で期限を迎える
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    interval: Duration,
    queue: FrameQueue,
}

impl SystemClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            queue: FrameQueue::default(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.queue.pending.len()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn request_frame(&mut self) -> FrameHandle {
        let due = next_frame_boundary(self.now(), self.interval);
        self.queue.request(due)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }

    fn take_due(&mut self) -> Option<FrameHandle> {
        let now = self.now();
        self.queue.take_due(now)
    }
}

/// 手動で進めるクロック。`advance` を呼ぶまで時間は止まっている
#[derive(Debug)]
pub struct ManualClock {
    now: Duration,
    interval: Duration,
    queue: FrameQueue,
}

impl ManualClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            interval,
            queue: FrameQueue::default(),
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// 1フレーム間隔だけ進める
    pub fn step(&mut self) {
        self.now += self.interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn pending_len(&self) -> usize {
        self.queue.pending.len()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.queue.request(self.now + self.interval)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }

    fn take_due(&mut self) -> Option<FrameHandle> {
        self.queue.take_due(self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_frames_fire_after_one_interval() {
        let mut clock = ManualClock::new(Duration::from_millis(10));
        let h = clock.request_frame();
        assert_eq!(clock.take_due(), None);

        clock.advance(Duration::from_millis(9));
        assert_eq!(clock.take_due(), None);

        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.take_due(), Some(h));
        assert_eq!(clock.take_due(), None);
        assert_eq!(clock.pending_len(), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut clock = ManualClock::default();
        let h = clock.request_frame();
        clock.cancel_frame(h);
        clock.cancel_frame(h);
        assert_eq!(clock.pending_len(), 0);

        clock.step();
        assert_eq!(clock.take_due(), None);
    }

    #[test]
    fn handles_are_unique() {
        let mut clock = ManualClock::default();
        let a = clock.request_frame();
        let b = clock.request_frame();
        assert_ne!(a, b);
    }

    #[test]
    fn due_frames_come_out_in_order() {
        let mut clock = ManualClock::new(Duration::from_millis(5));
        let first = clock.request_frame();
        clock.advance(Duration::from_millis(2));
        let second = clock.request_frame();
        clock.advance(Duration::from_millis(10));

        assert_eq!(clock.take_due(), Some(first));
        assert_eq!(clock.take_due(), Some(second));
    }

    #[test]
    fn system_clock_cancels_pending_frames() {
        let mut clock = SystemClock::new(Duration::from_micros(16_667));
        let h = clock.request_frame();
        assert_eq!(clock.pending_len(), 1);
        clock.cancel_frame(h);
        assert_eq!(clock.pending_len(), 0);
        assert_eq!(clock.take_due(), None);
    }

    #[test]
    fn boundaries_sit_on_the_interval_grid() {
        let interval = Duration::from_micros(16_667);
        assert_eq!(
            next_frame_boundary(Duration::ZERO, interval),
            Duration::from_micros(16_667)
        );
        // 描画に 0.2ms かかった後でも次の境界は 2 フレーム目
        assert_eq!(
            next_frame_boundary(Duration::from_micros(16_900), interval),
            Duration::from_micros(33_334)
        );
        // ちょうど境界上なら次の境界
        assert_eq!(
            next_frame_boundary(Duration::from_micros(33_334), interval),
            Duration::from_micros(50_001)
        );
        assert_eq!(
            next_frame_boundary(Duration::from_millis(3), Duration::ZERO),
            Duration::from_millis(3)
        );
    }

    #[test]
    fn system_clock_keeps_pace_across_slow_frames() {
        let interval = Duration::from_millis(40);
        let mut clock = SystemClock::new(interval);

        let first = clock.request_frame();
        std::thread::sleep(interval + Duration::from_millis(5));
        assert_eq!(clock.take_due(), Some(first));

        // 描画に時間がかかった想定
        std::thread::sleep(Duration::from_millis(10));
        let second = clock.request_frame();
        let boundary = next_frame_boundary(clock.now(), interval);

        // 予約から1間隔待たなくても、次の境界を過ぎれば発火する
        while clock.now() < boundary {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(clock.take_due(), Some(second));
        assert_eq!(clock.pending_len(), 0);
    }
}
