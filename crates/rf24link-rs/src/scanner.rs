//! Spectrum activity measurement using the radio's carrier detection.
//!
//! A channel is measured by listening on it and repeatedly sampling the
//! RPD bit (received power above -64 dBm) every 2 milliseconds.
//! The share of samples that detected a carrier is the channel's activity.
use core::{
    ops::ControlFlow,
    sync::atomic::{AtomicBool, Ordering},
};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::{
    poll::{poll_until, PollSchedule, Sleep},
    radio::{
        prelude::{EsbCarrier, EsbChannel, EsbMode},
        MAX_CHANNEL,
    },
    ConfigError,
};

/// The number of channels supported by the radio.
pub const CHANNEL_COUNT: usize = MAX_CHANNEL as usize + 1;

/// Channels overlapping common WiFi channels.
///
/// This is the usual subset for [`Scanner::continuous_scan()`].
pub const CONGESTED_CHANNELS: [u8; 11] = [1, 6, 11, 36, 40, 44, 48, 52, 56, 60, 64];

/// Every 5th channel.
///
/// This is the usual subset for [`Scanner::find_quietest_channel()`].
pub const QUIET_CANDIDATES: [u8; 26] = {
    let mut channels = [0u8; 26];
    let mut i = 0;
    while i < channels.len() {
        channels[i] = i as u8 * 5;
        i += 1;
    }
    channels
};

/// Activity (in percent) above which a channel is considered busy.
pub const ACTIVE_THRESHOLD: f32 = 10.0;

const SAMPLE_INTERVAL_MS: u32 = 2;

/// Per channel dwell time (in milliseconds) used by [`Scanner::continuous_scan()`].
const SWEEP_DWELL_MS: u32 = 10;

/// Per channel dwell time (in milliseconds) used by [`Scanner::rank_channels()`].
const RANK_DWELL_MS: u32 = 50;

/// How often (in milliseconds) the [`CancelToken`] is checked between sweeps.
const CANCEL_CHECK_MS: u32 = 100;

/// The results of measuring a single channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSample {
    pub channel: u8,
    /// The number of samples that detected a carrier.
    pub detections: u32,
    /// The number of samples taken.
    pub samples: u32,
    /// `detections / samples` as a percentage, rounded to a whole number.
    pub activity: f32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScanSample {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Ch{=u8} ({=u16} MHz): {=f32}%",
            self.channel,
            self.frequency_mhz(),
            self.activity
        )
    }
}

impl ScanSample {
    fn new(channel: u8, detections: u32, samples: u32) -> Self {
        Self {
            channel,
            detections,
            samples,
            activity: activity_percent(detections, samples),
        }
    }

    /// The center frequency of the channel.
    pub const fn frequency_mhz(&self) -> u16 {
        2400 + self.channel as u16
    }

    /// Is the activity above [`ACTIVE_THRESHOLD`]?
    pub fn is_active(&self) -> bool {
        self.activity > ACTIVE_THRESHOLD
    }
}

/// `detections / samples * 100`, rounded half up.
fn activity_percent(detections: u32, samples: u32) -> f32 {
    let samples = samples.max(1) as u64;
    let detections = (detections as u64).min(samples);
    ((detections * 200 + samples) / (samples * 2)) as f32
}

/// A flag to stop [`Scanner::continuous_scan()`].
///
/// This can live in a `static` and be set from an interrupt handler.
/// ```
/// use rf24link::scanner::CancelToken;
/// static STOP: CancelToken = CancelToken::new();
/// STOP.cancel();
/// assert!(STOP.is_cancelled());
/// ```
#[derive(Debug, Default)]
pub struct CancelToken(AtomicBool);

impl CancelToken {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear a previous cancellation request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stable ascending sort by activity.
fn sort_by_activity(samples: &mut [ScanSample]) {
    for i in 1..samples.len() {
        let mut j = i;
        while j > 0 && samples[j - 1].activity > samples[j].activity {
            samples.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Measures channel activity through an exclusively borrowed radio.
///
/// The radio should be initialized first. The scanner changes the radio's channel
/// and always leaves it not listening.
pub struct Scanner<'r, R, D> {
    radio: &'r mut R,
    delay: D,
}

impl<R, D: DelayNs> Sleep for Scanner<'_, R, D> {
    fn sleep_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<'r, R, D, E> Scanner<'r, R, D>
where
    R: EsbChannel<ChannelErrorType = E>
        + EsbMode<ModeErrorType = E>
        + EsbCarrier<CarrierErrorType = E>,
    E: From<ConfigError>,
    D: DelayNs,
{
    pub fn new(radio: &'r mut R, delay: D) -> Self {
        Self { radio, delay }
    }

    /// Access the borrowed radio.
    pub fn radio(&mut self) -> &mut R {
        self.radio
    }

    fn count_detections(&mut self, schedule: PollSchedule) -> Result<u32, E> {
        let mut detections = 0;
        poll_until::<_, (), E, _>(self, schedule, |s| {
            if s.radio.rpd()? {
                detections += 1;
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(detections)
    }

    /// Measure a `channel` for `duration_ms` milliseconds.
    ///
    /// `max(1, duration_ms / 2)` samples are taken 2 milliseconds apart.
    /// The radio stops listening afterward, even if sampling failed.
    pub fn sample_channel(&mut self, channel: u8, duration_ms: u32) -> Result<ScanSample, E> {
        if channel > MAX_CHANNEL {
            return Err(ConfigError::Channel(channel).into());
        }
        self.radio.set_channel(channel)?;
        let schedule = PollSchedule::from_millis(SAMPLE_INTERVAL_MS, duration_ms);
        let counted = match self.radio.start_listening() {
            Ok(()) => self.count_detections(schedule),
            Err(e) => Err(e),
        };
        let stopped = self.radio.stop_listening();
        let detections = counted?;
        stopped?;
        Ok(ScanSample::new(channel, detections, schedule.ticks()))
    }

    /// Measure a `channel` for `duration_ms` milliseconds and return its activity.
    ///
    /// See [`Scanner::sample_channel()`].
    pub fn scan_channel(&mut self, channel: u8, duration_ms: u32) -> Result<f32, E> {
        Ok(self.sample_channel(channel, duration_ms)?.activity)
    }

    /// Measure every channel (in ascending order) for `duration_per_channel_ms`
    /// milliseconds each.
    ///
    /// Only channels where any carrier was detected are returned, in channel order.
    /// This includes channels whose rounded activity is 0%.
    pub fn scan_all_channels(
        &mut self,
        duration_per_channel_ms: u32,
    ) -> Result<Vec<ScanSample, CHANNEL_COUNT>, E> {
        let mut active = Vec::new();
        for channel in 0..=MAX_CHANNEL {
            let sample = self.sample_channel(channel, duration_per_channel_ms)?;
            if sample.detections > 0 {
                #[cfg(feature = "defmt")]
                defmt::info!("{}", sample);
                // capacity covers every channel
                let _ = active.push(sample);
            }
        }
        Ok(active)
    }

    /// Block for `interval_s` seconds unless `cancel` is set.
    ///
    /// Returns `true` if cancelled.
    fn wait_interval(&mut self, interval_s: u32, cancel: &CancelToken) -> Result<bool, E> {
        if interval_s == 0 {
            return Ok(cancel.is_cancelled());
        }
        let cancelled = poll_until::<_, (), E, _>(
            self,
            PollSchedule::from_secs(CANCEL_CHECK_MS, interval_s),
            |_| {
                Ok(if cancel.is_cancelled() {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                })
            },
        )?;
        Ok(cancelled.is_some())
    }

    /// Repeatedly measure `channels` (10 milliseconds each) until `cancel` is set.
    ///
    /// Each sweep's results are given to `on_sweep`. Sweeps are `interval_s` seconds apart.
    /// `cancel` is checked before every sweep and every 100 milliseconds while waiting
    /// between sweeps. Only the first 126 `channels` are used.
    ///
    /// Returns the number of completed sweeps.
    pub fn continuous_scan<F>(
        &mut self,
        channels: &[u8],
        interval_s: u32,
        cancel: &CancelToken,
        mut on_sweep: F,
    ) -> Result<u32, E>
    where
        F: FnMut(&[ScanSample]),
    {
        if channels.is_empty() {
            return Err(ConfigError::NoChannels.into());
        }
        let mut sweeps = 0;
        while !cancel.is_cancelled() {
            let mut sweep: Vec<ScanSample, CHANNEL_COUNT> = Vec::new();
            for &channel in channels.iter().take(CHANNEL_COUNT) {
                let sample = self.sample_channel(channel, SWEEP_DWELL_MS)?;
                #[cfg(feature = "defmt")]
                if sample.is_active() {
                    defmt::info!("{} ACTIVE", sample);
                }
                // at most CHANNEL_COUNT channels are taken
                let _ = sweep.push(sample);
            }
            sweeps += 1;
            on_sweep(&sweep);
            if self.wait_interval(interval_s, cancel)? {
                break;
            }
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("continuous scan stopped after {=u32} sweeps", sweeps);
        Ok(sweeps)
    }

    /// Measure `channels` (50 milliseconds each) and sort them from least to most active.
    ///
    /// Channels with equal activity keep their order from `channels`.
    /// Only the first 126 `channels` are used.
    pub fn rank_channels(&mut self, channels: &[u8]) -> Result<Vec<ScanSample, CHANNEL_COUNT>, E> {
        let mut ranked: Vec<ScanSample, CHANNEL_COUNT> = Vec::new();
        for &channel in channels.iter().take(CHANNEL_COUNT) {
            let sample = self.sample_channel(channel, RANK_DWELL_MS)?;
            // at most CHANNEL_COUNT channels are taken
            let _ = ranked.push(sample);
        }
        sort_by_activity(&mut ranked);
        #[cfg(feature = "defmt")]
        for (i, sample) in ranked.iter().take(5).enumerate() {
            defmt::info!("{=usize}. {}", i + 1, sample);
        }
        Ok(ranked)
    }

    /// Find the least active of the given `channels`.
    ///
    /// Ties resolve to the channel listed first.
    /// An empty `channels` is rejected with [`ConfigError::NoChannels`].
    pub fn find_quietest_channel(&mut self, channels: &[u8]) -> Result<u8, E> {
        let ranked = self.rank_channels(channels)?;
        ranked
            .first()
            .map(|sample| sample.channel)
            .ok_or_else(|| ConfigError::NoChannels.into())
    }
}
