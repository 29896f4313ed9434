pub const CLIGHT: f64 = 299792458.0; // speed of light (m/s)
pub const SC2RAD: f64 = 3.1415926535898; // semi-circle to radian (IS-GPS)

pub const PRUNIT_GPS: f64 = 299792.458; // rtcm ver.3 unit of GPS pseudorange (m)
pub const PRUNIT_GLO: f64 = 599584.916; // rtcm ver.3 unit of GLONASS pseudorange (m)
pub const RANGE_MS: f64 = CLIGHT * 0.001; // range in 1 ms (m)

pub const FREQ1: f64 = 1.57542E9; // L1/E1/B1C frequency (Hz)
pub const FREQ2: f64 = 1.22760E9; // L2 frequency (Hz)
pub const FREQ5: f64 = 1.17645E9; // L5/E5a/B2a frequency (Hz)
pub const FREQ6: f64 = 1.27875E9; // E6/L6 frequency (Hz)
pub const FREQ7: f64 = 1.20714E9; // E5b frequency (Hz)
pub const FREQ8: f64 = 1.191795E9; // E5a+b frequency (Hz)
pub const FREQ9: f64 = 2.492028E9; // S frequency (Hz)
pub const FREQ1_GLO: f64 = 1.60200E9; // GLONASS G1 base frequency (Hz)
pub const DFRQ1_GLO: f64 = 0.56250E6; // GLONASS G1 bias frequency (Hz/n)
pub const FREQ2_GLO: f64 = 1.24600E9; // GLONASS G2 base frequency (Hz)
pub const DFRQ2_GLO: f64 = 0.43750E6; // GLONASS G2 bias frequency (Hz/n)
pub const FREQ3_GLO: f64 = 1.202025E9; // GLONASS G3 frequency (Hz)
pub const FREQ1A_GLO: f64 = 1.600995E9; // GLONASS G1a frequency (Hz)
pub const FREQ2A_GLO: f64 = 1.248060E9; // GLONASS G2a frequency (Hz)
pub const FREQ1_CMP: f64 = 1.561098E9; // BDS B1I frequency (Hz)
pub const FREQ2_CMP: f64 = 1.20714E9; // BDS B2I/B2b frequency (Hz)
pub const FREQ3_CMP: f64 = 1.26852E9; // BDS B3 frequency (Hz)

pub const MINFREQ_GLO: i32 = -7;
pub const MAXFREQ_GLO: i32 = 13;

// powers of two used as rtcm ver.3 field scale factors
pub const P2_4: f64 = 1.0 / (1u64 << 4) as f64;
pub const P2_5: f64 = 1.0 / (1u64 << 5) as f64;
pub const P2_6: f64 = 1.0 / (1u64 << 6) as f64;
pub const P2_11: f64 = 1.0 / (1u64 << 11) as f64;
pub const P2_19: f64 = 1.0 / (1u64 << 19) as f64;
pub const P2_20: f64 = 1.0 / (1u64 << 20) as f64;
pub const P2_24: f64 = 1.0 / (1u64 << 24) as f64;
pub const P2_28: f64 = 1.0 / (1u64 << 28) as f64;
pub const P2_29: f64 = 1.0 / (1u64 << 29) as f64;
pub const P2_30: f64 = 1.0 / (1u64 << 30) as f64;
pub const P2_31: f64 = 1.0 / (1u64 << 31) as f64;
pub const P2_32: f64 = 1.0 / (1u64 << 32) as f64;
pub const P2_33: f64 = 1.0 / (1u64 << 33) as f64;
pub const P2_34: f64 = 1.0 / (1u64 << 34) as f64;
pub const P2_40: f64 = 1.0 / (1u64 << 40) as f64;
pub const P2_41: f64 = 1.0 / (1u64 << 41) as f64;
pub const P2_43: f64 = 1.0 / (1u64 << 43) as f64;
pub const P2_46: f64 = 1.0 / (1u64 << 46) as f64;
pub const P2_50: f64 = 1.0 / (1u64 << 50) as f64;
pub const P2_55: f64 = 1.0 / (1u64 << 55) as f64;
pub const P2_59: f64 = 1.0 / (1u64 << 59) as f64;
pub const P2_66: f64 = 1.0 / (1u128 << 66) as f64;

pub const NSATGPS: usize = 32;
pub const NSATGLO: usize = 27;
pub const NSATGAL: usize = 36;
pub const NSATQZS: usize = 10;
pub const NSATCMP: usize = 63;
pub const NSATIRN: usize = 14;
pub const NSATSBS: usize = 39;
pub const MAXSAT: usize = NSATGPS + NSATGLO + NSATGAL + NSATQZS + NSATCMP + NSATIRN + NSATSBS;
pub const MINPRNGPS: usize = 1;
pub const MAXPRNGPS: usize = 32;
pub const MINPRNGLO: usize = 1;
pub const MAXPRNGLO: usize = 27;
pub const MINPRNGAL: usize = 1;
pub const MAXPRNGAL: usize = 36;
pub const MINPRNQZS: usize = 193;
pub const MAXPRNQZS: usize = 202;
pub const MINPRNCMP: usize = 1;
pub const MAXPRNCMP: usize = 63;
pub const MINPRNIRN: usize = 1;
pub const MAXPRNIRN: usize = 14;
pub const MINPRNSBS: usize = 120;
pub const MAXPRNSBS: usize = 158;

pub const SYS_GPS: usize = 1 << 0;
pub const SYS_GLO: usize = 1 << 1;
pub const SYS_GAL: usize = 1 << 2;
pub const SYS_QZS: usize = 1 << 3;
pub const SYS_CMP: usize = 1 << 4;
pub const SYS_IRN: usize = 1 << 5;
pub const SYS_SBS: usize = 1 << 6;
pub const SYS_NONE: usize = 0;

/// GPS-UTC leap seconds as (utc unix seconds, offset), newest first
pub const LEAPS: [(i64, f64); 18] = [
    (1483228800, -18.0), // 2017/01/01
    (1435708800, -17.0), // 2015/07/01
    (1341100800, -16.0), // 2012/07/01
    (1230768000, -15.0), // 2009/01/01
    (1136073600, -14.0), // 2006/01/01
    (915148800, -13.0),  // 1999/01/01
    (867715200, -12.0),  // 1997/07/01
    (820454400, -11.0),  // 1996/01/01
    (773020800, -10.0),  // 1994/07/01
    (741484800, -9.0),   // 1993/07/01
    (709948800, -8.0),   // 1992/07/01
    (662688000, -7.0),   // 1991/01/01
    (631152000, -6.0),   // 1990/01/01
    (567993600, -5.0),   // 1988/01/01
    (489024000, -4.0),   // 1985/07/01
    (425865600, -3.0),   // 1983/07/01
    (394329600, -2.0),   // 1982/07/01
    (362793600, -1.0),   // 1981/07/01
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GTime {
    pub time: i64,
    pub sec: f64,
}

impl GTime {
    /// an all-zero time marks "unset"
    pub fn valid(&self) -> bool {
        self.time != 0
    }

    pub fn reset(&mut self) {
        *self = GTime::default();
    }
}

impl PartialEq for GTime {
    fn eq(&self, other: &Self) -> bool {
        self.diff(*other).abs() < 1E-9
    }
}

/// observation data on a single frequency/signal
///
/// Numeric fields are `None` when the message carried the corresponding
/// invalid sentinel; an absent field must never be read as zero.
#[derive(Debug, Clone, Default)]
pub struct FrqObs {
    pub rnx_type2ch: String,      // RINEX band+attribute code ("1C","2W",...)
    pub code: Option<f64>,        // pseudorange (m)
    pub phase: Option<f64>,       // carrier phase (cycle)
    pub doppler: Option<f64>,     // doppler (Hz)
    pub snr: Option<f64>,         // carrier-to-noise ratio (dB-Hz)
    pub lock_time_indicator: u32, // raw lock time indicator
    pub lock_time: Option<f64>,   // lock time (s)
}

/// all signals of one satellite at one epoch
#[derive(Debug, Clone, Default)]
pub struct SatObs {
    pub sat: usize,    // satellite number
    pub time: GTime,   // observation epoch (gpst)
    pub msg_type: u16, // source message number
    pub obs: Vec<FrqObs>,
}

/// GPS/QZS/GAL/BDS/IRN broadcast ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct Eph {
    pub sat: usize, // satellite number
    pub iode: i32,
    pub iodc: i32,
    pub sva: i32,  // SV accuracy (URA/SISA index)
    pub svh: i32,  // SV health (0: ok)
    pub week: i32, // GPS/QZS/GAL: gps week, BDS: BDT week
    pub code: i32, // GPS/QZS: code on L2, GAL: data source
    pub flag: i32, // GPS/QZS: L2 P data flag, BDS: nav type (1: IGSO/MEO, 2: GEO)
    pub toe: GTime,
    pub toc: GTime,
    pub ttr: GTime,
    // SV orbit parameters
    pub a: f64, // semi-major axis (m)
    pub e: f64,
    pub i0: f64,
    pub omg0: f64,
    pub omg: f64,
    pub m0: f64,
    pub deln: f64,
    pub omgd: f64,
    pub idot: f64,
    pub crc: f64,
    pub crs: f64,
    pub cuc: f64,
    pub cus: f64,
    pub cic: f64,
    pub cis: f64,
    pub toes: f64,     // Toe (s) in week
    pub fit: f64,      // fit interval (h)
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,       // SV clock parameters (af0, af1, af2)
    pub tgd: [f64; 2], // GPS/QZS/IRN: tgd[0] = TGD
                       // GAL: tgd[0] = BGD_E1E5a, tgd[1] = BGD_E1E5b
                       // BDS: tgd[0] = TGD1, tgd[1] = TGD2
}

/// GLONASS broadcast ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct Geph {
    pub sat: usize,    // satellite number
    pub iode: i32,     // IODE (0-6 bit of tb field)
    pub frq: i32,      // satellite frequency number
    pub svh: i32,      // satellite health
    pub sva: i32,      // satellite accuracy
    pub age: i32,      // age of operation
    pub toe: GTime,    // epoch of ephemerides (gpst)
    pub tof: GTime,    // message frame time (gpst)
    pub pos: [f64; 3], // satellite position (ecef) (m)
    pub vel: [f64; 3], // satellite velocity (ecef) (m/s)
    pub acc: [f64; 3], // satellite acceleration (ecef) (m/s^2)
    pub taun: f64,     // SV clock bias (s)
    pub gamn: f64,     // relative frequency bias
    pub dtaun: f64,    // delay between L1 and L2 (s)
}

/// SBAS broadcast ephemeris
#[derive(Debug, Clone, Copy, Default)]
pub struct Seph {
    pub sat: usize,    // satellite number
    pub t0: GTime,     // reference epoch time (gpst)
    pub tof: GTime,    // time of message frame (gpst)
    pub sva: i32,      // SV accuracy (URA index)
    pub svh: i32,      // SV health (0: ok)
    pub pos: [f64; 3], // satellite position (m) (ecef)
    pub vel: [f64; 3], // satellite velocity (m/s) (ecef)
    pub acc: [f64; 3], // satellite acceleration (m/s^2) (ecef)
    pub af0: f64,      // satellite clock offset (s)
    pub af1: f64,      // satellite clock drift (s/s)
}

/// decoded navigation data
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub n: usize,  // number of broadcast ephemerides
    pub ng: usize, // number of GLONASS ephemerides
    pub ns: usize, // number of SBAS ephemerides
    pub eph: Vec<Eph>,
    pub geph: Vec<Geph>,
    pub seph: Vec<Seph>,
}

impl Nav {
    pub fn new() -> Self {
        Nav::default()
    }

    pub fn add_eph(&mut self, eph: Eph) -> bool {
        self.eph.push(eph);
        self.n += 1;
        true
    }

    pub fn add_geph(&mut self, geph: Geph) -> bool {
        self.geph.push(geph);
        self.ng += 1;
        true
    }

    pub fn add_seph(&mut self, seph: Seph) -> bool {
        self.seph.push(seph);
        self.ns += 1;
        true
    }
}

/// antenna descriptor with serial number (msg 1007/1008/1033)
#[derive(Debug, Clone, Default)]
pub struct AntInfo {
    pub descriptor: String,
    pub serial: String,
}

/// receiver descriptor (msg 1033)
#[derive(Debug, Clone, Default)]
pub struct RecInfo {
    pub descriptor: String,
    pub firmware: String,
    pub serial: String,
}

/// antenna reference point position (msg 1005/1006)
#[derive(Debug, Clone, Default)]
pub struct AntRefPoint {
    pub x: f64, // ecef (m)
    pub y: f64,
    pub z: f64,
    pub height: Option<f64>, // antenna height (m), msg 1006 only
    pub msg_type: u16,
}
