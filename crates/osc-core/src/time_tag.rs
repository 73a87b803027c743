//! NTP timetags.
//!
//! OSC timestamps use the 64-bit NTP fixed-point format: 32 bits of
//! seconds since 1900-01-01 00:00 UTC followed by 32 bits of fraction
//! of a second (units of 2^-32 s).

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_DELTA: u64 = 2_208_988_800;

/// 2^32 as a float, the scale of the fractional part.
const FRAC_SCALE: f64 = 4_294_967_296.0;

/// A 64-bit NTP timetag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeTag {
    /// Whole seconds since the NTP epoch.
    pub seconds: u32,

    /// Fractional part in units of 2^-32 seconds.
    pub fraction: u32,
}

impl TimeTag {
    /// The special "immediately" timetag (`0x00000000_00000001`).
    pub const IMMEDIATELY: TimeTag = TimeTag {
        seconds: 0,
        fraction: 1,
    };

    pub fn new(seconds: u32, fraction: u32) -> Self {
        TimeTag { seconds, fraction }
    }

    /// Build a timetag from fractional seconds since the NTP epoch.
    ///
    /// The fraction is `round(frac * 2^32)`; a fraction that rounds up to
    /// a whole second carries into `seconds`. Values outside the
    /// representable range saturate.
    pub fn from_secs_f64(t: f64) -> Self {
        if t.is_nan() || t <= 0.0 {
            return TimeTag::default();
        }
        if t >= u32::MAX as f64 + 1.0 {
            return TimeTag::new(u32::MAX, u32::MAX);
        }

        let whole = t.trunc();
        let frac = ((t - whole) * FRAC_SCALE).round();
        let mut seconds = whole as u64;
        let mut fraction = frac as u64;

        if fraction > u32::MAX as u64 {
            seconds += 1;
            fraction = 0;
        }
        if seconds > u32::MAX as u64 {
            return TimeTag::new(u32::MAX, u32::MAX);
        }

        TimeTag::new(seconds as u32, fraction as u32)
    }

    /// Fractional seconds since the NTP epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.fraction as f64 / FRAC_SCALE
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        TimeTag::from(Utc::now())
    }

    pub fn is_immediately(&self) -> bool {
        *self == TimeTag::IMMEDIATELY
    }

    /// Convert to a UTC date-time, if it falls within chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let unix_secs = self.seconds as i64 - NTP_DELTA as i64;
        let nanos = ((self.fraction as u64 * 1_000_000_000) >> 32) as u32;
        Utc.timestamp_opt(unix_secs, nanos).single()
    }

    /// The 8 wire bytes: big-endian seconds then big-endian fraction.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.seconds.to_be_bytes());
        out[4..].copy_from_slice(&self.fraction.to_be_bytes());
        out
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        let seconds = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let fraction = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        TimeTag { seconds, fraction }
    }
}

impl From<DateTime<Utc>> for TimeTag {
    fn from(dt: DateTime<Utc>) -> Self {
        let ntp_secs = dt.timestamp() + NTP_DELTA as i64;
        if ntp_secs < 0 {
            return TimeTag::default();
        }
        if ntp_secs > u32::MAX as i64 {
            return TimeTag::new(u32::MAX, u32::MAX);
        }
        // chrono reports leap seconds as nanos >= 1e9
        let nanos = dt.timestamp_subsec_nanos().min(999_999_999) as u64;
        let fraction = (nanos << 32) / 1_000_000_000;
        TimeTag::new(ntp_secs as u32, fraction as u32)
    }
}

impl From<f64> for TimeTag {
    fn from(t: f64) -> Self {
        TimeTag::from_secs_f64(t)
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_immediately() {
            write!(f, "immediately")
        } else {
            write!(f, "{:.6}", self.as_secs_f64())
        }
    }
}
