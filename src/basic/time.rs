use crate::basic::var::{GTime, LEAPS};
use chrono::{TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// unix seconds at the GPS time origin (1980/01/06 00:00:00)
const GPST0_UNIX: i64 = 315964800;
/// unix seconds at the BDS time origin (2006/01/01 00:00:00)
const BDT0_UNIX: i64 = 1136073600;
const SECS_WEEK: i64 = 604800;
const SECS_DAY: f64 = 86400.0;

impl GTime {
    /// shift by a second count, fractional and negative allowed
    pub fn add_secs(mut self, sec: f64) -> GTime {
        let total = self.sec + sec;
        self.time += total.div_euclid(1.0) as i64;
        self.sec = total.rem_euclid(1.0);
        self
    }

    /// difference to another time (s)
    pub fn diff(self, other: GTime) -> f64 {
        (self.time - other.time) as f64 + self.sec - other.sec
    }
}

/// current system time (utc)
pub fn timeget() -> GTime {
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    GTime {
        time: t.as_secs() as i64,
        sec: 0.0,
    }
}

fn weeks_time(origin: i64, week: i32, sec: f64) -> GTime {
    let sec = if sec.abs() > 1E9 { 0.0 } else { sec };
    let t = GTime {
        time: origin + SECS_WEEK * week as i64,
        sec: 0.0,
    };
    t.add_secs(sec)
}

fn time_weeks(origin: i64, t: GTime, week: Option<&mut i32>) -> f64 {
    let elapsed = t.time - origin;
    let w = elapsed.div_euclid(SECS_WEEK);
    if let Some(week) = week {
        *week = w as i32;
    }
    (elapsed - w * SECS_WEEK) as f64 + t.sec
}

pub fn gpst2time(week: i32, sec: f64) -> GTime {
    weeks_time(GPST0_UNIX, week, sec)
}

pub fn time2gpst(t: GTime, week: Option<&mut i32>) -> f64 {
    time_weeks(GPST0_UNIX, t, week)
}

pub fn bdt2time(week: i32, sec: f64) -> GTime {
    weeks_time(BDT0_UNIX, week, sec)
}

pub fn time2bdt(t: GTime, week: Option<&mut i32>) -> f64 {
    time_weeks(BDT0_UNIX, t, week)
}

// BDT runs 14 s behind GPST
pub fn bdt2gpst(t: GTime) -> GTime {
    t.add_secs(14.0)
}

pub fn gpst2bdt(t: GTime) -> GTime {
    t.add_secs(-14.0)
}

pub fn gpst2utc(t: GTime) -> GTime {
    for &(since, leap) in LEAPS.iter() {
        let tu = t.add_secs(leap);
        if tu.time >= since {
            return tu;
        }
    }
    t
}

pub fn utc2gpst(t: GTime) -> GTime {
    for &(since, leap) in LEAPS.iter() {
        if t.time >= since {
            return t.add_secs(-leap);
        }
    }
    t
}

pub fn time2str(t: GTime) -> String {
    let mut secs = t.time;
    if 1.0 - t.sec < 0.5 {
        secs += 1;
    }
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y/%m/%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// move t by whole periods until it lies within half a period of t0
fn wrap_near(t: GTime, t0: GTime, period: f64) -> GTime {
    let dt = t.diff(t0);
    if dt < -period / 2.0 {
        t.add_secs(period)
    } else if dt > period / 2.0 {
        t.add_secs(-period)
    } else {
        t
    }
}

/// resolve a GPS time of week (ms) against the current GPS week
pub fn tow2gpst(tow_ms: f64) -> GTime {
    let now = utc2gpst(timeget());
    let mut week = 0;
    time2gpst(now, Some(&mut week));
    wrap_near(gpst2time(week, tow_ms / 1000.0), now, SECS_WEEK as f64)
}

/// resolve a GPS time of day (ms) against the current GPS day
pub fn tod2gpst(tod_ms: f64) -> GTime {
    let now = utc2gpst(timeget());
    let mut week = 0;
    let tow = time2gpst(now, Some(&mut week));
    let day_start = tow - tow % SECS_DAY;
    wrap_near(gpst2time(week, day_start + tod_ms / 1000.0), now, SECS_DAY)
}

/// resolve a GLONASS time of day (ms, Moscow time) against the current day
pub fn glot2gpst(tod_ms: f64) -> GTime {
    let now = utc2gpst(timeget());
    let glo = gpst2utc(now).add_secs(3.0 * 3600.0);
    let mut week = 0;
    let tow = time2gpst(glo, Some(&mut week));
    let day_start = tow - tow % SECS_DAY;
    let t = wrap_near(gpst2time(week, day_start + tod_ms / 1000.0), glo, SECS_DAY);
    utc2gpst(t.add_secs(-3.0 * 3600.0))
}

/// resolve a BDS time of week (ms) against the current BDT week
pub fn bdt_tow2gpst(tow_ms: f64) -> GTime {
    let now = gpst2bdt(utc2gpst(timeget()));
    let mut week = 0;
    time2bdt(now, Some(&mut week));
    bdt2gpst(wrap_near(bdt2time(week, tow_ms / 1000.0), now, SECS_WEEK as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_origin() {
        assert_eq!(time2str(gpst2time(0, 0.0)), "1980/01/06 00:00:00");
    }

    #[test]
    fn test_time2gpst_inverse() {
        let t = gpst2time(2256, 345600.0);
        let mut week = 0;
        let tow = time2gpst(t, Some(&mut week));
        assert_eq!(week, 2256);
        assert_eq!(tow, 345600.0);
    }

    #[test]
    fn test_add_secs_carries() {
        let t = GTime {
            time: 100,
            sec: 0.2,
        };
        let t = t.add_secs(-0.5);
        assert_eq!(t.time, 99);
        assert!((t.sec - 0.7).abs() < 1E-12);
        let t = t.add_secs(1.3);
        assert_eq!(t.time, 101);
    }

    #[test]
    fn test_wrap_near_week() {
        // a tow near zero belongs to the following week
        let t0 = gpst2time(2256, 604700.0);
        let t = wrap_near(gpst2time(2256, 10.0), t0, SECS_WEEK as f64);
        let mut week = 0;
        time2gpst(t, Some(&mut week));
        assert_eq!(week, 2257);
    }

    #[test]
    fn test_bdt_offset() {
        assert_eq!(time2str(bdt2gpst(bdt2time(0, 0.0))), "2006/01/01 00:00:14");
    }

    #[test]
    fn test_leap_seconds() {
        // 2020/01/01 utc
        let utc = GTime {
            time: 1577836800,
            sec: 0.0,
        };
        let gpst = utc2gpst(utc);
        assert_eq!(gpst.diff(utc), 18.0);
        assert_eq!(gpst2utc(gpst).diff(utc), 0.0);
    }

    #[test]
    fn test_tow2gpst_resolves_current_week() {
        let now = utc2gpst(timeget());
        let mut week = 0;
        let tow = time2gpst(now, Some(&mut week));
        let t = tow2gpst(tow * 1000.0);
        assert!(t.diff(now).abs() < 1.0);
    }
}
