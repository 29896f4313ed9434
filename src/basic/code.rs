use crate::basic::var::*;

pub const WL_GPS_L1: f64 = CLIGHT / FREQ1;
pub const WL_GPS_L2: f64 = CLIGHT / FREQ2;
pub const WL_GPS_L5: f64 = CLIGHT / FREQ5;
pub const WL_GAL_E1: f64 = CLIGHT / FREQ1;
pub const WL_GAL_E5A: f64 = CLIGHT / FREQ5;
pub const WL_GAL_E5B: f64 = CLIGHT / FREQ7;
pub const WL_GAL_E5AB: f64 = CLIGHT / FREQ8;
pub const WL_GAL_E6: f64 = CLIGHT / FREQ6;
pub const WL_QZS_L6: f64 = CLIGHT / FREQ6;
pub const WL_BDS_B1: f64 = CLIGHT / FREQ1_CMP;
pub const WL_BDS_B2: f64 = CLIGHT / FREQ2_CMP;
pub const WL_BDS_B3: f64 = CLIGHT / FREQ3_CMP;
pub const WL_BDS_B1C: f64 = CLIGHT / FREQ1;
pub const WL_BDS_B2A: f64 = CLIGHT / FREQ5;
pub const WL_BDS_B2B: f64 = CLIGHT / FREQ2_CMP;
pub const WL_IRN_L5: f64 = CLIGHT / FREQ5;
pub const WL_IRN_S: f64 = CLIGHT / FREQ9;
pub const WL_GLO_L1A: f64 = CLIGHT / FREQ1A_GLO;
pub const WL_GLO_L2A: f64 = CLIGHT / FREQ2A_GLO;
pub const WL_GLO_L3: f64 = CLIGHT / FREQ3_GLO;

/// GLONASS FDMA L1 wavelength for frequency channel number k
pub fn glo_wavelength_l1(k: i32) -> f64 {
    CLIGHT / (FREQ1_GLO + DFRQ1_GLO * k as f64)
}

/// GLONASS FDMA L2 wavelength for frequency channel number k
pub fn glo_wavelength_l2(k: i32) -> f64 {
    CLIGHT / (FREQ2_GLO + DFRQ2_GLO * k as f64)
}

/// MSM signal slot: nominal wavelength and RINEX signal code.
///
/// An empty code marks a reserved slot. GLONASS FDMA slots carry the
/// placeholders 0.0 (L1 band) and 1.0 (L2 band); the real wavelength is
/// resolved from the satellite frequency channel at decode time.
#[derive(Debug, Clone, Copy)]
pub struct SigTab {
    pub wl: f64,
    pub code: &'static str,
}

const NONE: SigTab = SigTab { wl: 0.0, code: "" };

const fn sig(wl: f64, code: &'static str) -> SigTab {
    SigTab { wl, code }
}

/// MSM signal table for GPS and SBAS
pub const MSM_SIG_GPS: [SigTab; 32] = [
    NONE,
    sig(WL_GPS_L1, "1C"),
    sig(WL_GPS_L1, "1P"),
    sig(WL_GPS_L1, "1W"),
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L2, "2C"),
    sig(WL_GPS_L2, "2P"),
    sig(WL_GPS_L2, "2W"),
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L2, "2S"),
    sig(WL_GPS_L2, "2L"),
    sig(WL_GPS_L2, "2X"),
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L5, "5I"),
    sig(WL_GPS_L5, "5Q"),
    sig(WL_GPS_L5, "5X"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L1, "1S"),
    sig(WL_GPS_L1, "1L"),
    sig(WL_GPS_L1, "1X"),
];

/// MSM signal table for GLONASS
pub const MSM_SIG_GLO: [SigTab; 32] = [
    NONE,
    sig(0.0, "1C"),
    sig(0.0, "1P"),
    NONE,
    NONE,
    NONE,
    NONE,
    sig(1.0, "2C"),
    sig(1.0, "2P"),
    sig(WL_GLO_L1A, "4A"),
    sig(WL_GLO_L1A, "4B"),
    sig(WL_GLO_L1A, "4X"),
    sig(WL_GLO_L2A, "6A"),
    sig(WL_GLO_L2A, "6B"),
    sig(WL_GLO_L2A, "6X"),
    sig(WL_GLO_L3, "3I"),
    sig(WL_GLO_L3, "3Q"),
    sig(WL_GLO_L3, "3X"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
];

/// MSM signal table for Galileo
pub const MSM_SIG_GAL: [SigTab; 32] = [
    NONE,
    sig(WL_GAL_E1, "1C"),
    sig(WL_GAL_E1, "1A"),
    sig(WL_GAL_E1, "1B"),
    sig(WL_GAL_E1, "1X"),
    sig(WL_GAL_E1, "1Z"),
    NONE,
    sig(WL_GAL_E6, "6C"),
    sig(WL_GAL_E6, "6A"),
    sig(WL_GAL_E6, "6B"),
    sig(WL_GAL_E6, "6X"),
    sig(WL_GAL_E6, "6Z"),
    NONE,
    sig(WL_GAL_E5B, "7I"),
    sig(WL_GAL_E5B, "7Q"),
    sig(WL_GAL_E5B, "7X"),
    NONE,
    sig(WL_GAL_E5AB, "8I"),
    sig(WL_GAL_E5AB, "8Q"),
    sig(WL_GAL_E5AB, "8X"),
    NONE,
    sig(WL_GAL_E5A, "5I"),
    sig(WL_GAL_E5A, "5Q"),
    sig(WL_GAL_E5A, "5X"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
];

/// MSM signal table for QZSS
pub const MSM_SIG_QZS: [SigTab; 32] = [
    NONE,
    sig(WL_GPS_L1, "1C"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_QZS_L6, "6S"),
    sig(WL_QZS_L6, "6L"),
    sig(WL_QZS_L6, "6X"),
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L2, "2S"),
    sig(WL_GPS_L2, "2L"),
    sig(WL_GPS_L2, "2X"),
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L5, "5I"),
    sig(WL_GPS_L5, "5Q"),
    sig(WL_GPS_L5, "5X"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_GPS_L1, "1S"),
    sig(WL_GPS_L1, "1L"),
    sig(WL_GPS_L1, "1X"),
];

/// MSM signal table for BeiDou
pub const MSM_SIG_BDS: [SigTab; 32] = [
    NONE,
    sig(WL_BDS_B1, "2I"),
    sig(WL_BDS_B1, "2Q"),
    sig(WL_BDS_B1, "2X"),
    NONE,
    NONE,
    NONE,
    sig(WL_BDS_B3, "6I"),
    sig(WL_BDS_B3, "6Q"),
    sig(WL_BDS_B3, "6X"),
    NONE,
    NONE,
    NONE,
    sig(WL_BDS_B2, "7I"),
    sig(WL_BDS_B2, "7Q"),
    sig(WL_BDS_B2, "7X"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_BDS_B2A, "5D"),
    sig(WL_BDS_B2A, "5P"),
    sig(WL_BDS_B2A, "5X"),
    sig(WL_BDS_B2B, "7D"),
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_BDS_B1C, "1D"),
    sig(WL_BDS_B1C, "1P"),
    sig(WL_BDS_B1C, "1X"),
];

/// MSM signal table for IRNSS
pub const MSM_SIG_IRN: [SigTab; 32] = [
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_IRN_S, "9A"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    sig(WL_IRN_L5, "5A"),
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
    NONE,
];

/// look up the MSM signal slot for a system (idx is 0-based signal id - 1)
pub fn msm_sig(sys: usize, idx: usize) -> SigTab {
    let tab = match sys {
        SYS_GLO => &MSM_SIG_GLO,
        SYS_GAL => &MSM_SIG_GAL,
        SYS_QZS => &MSM_SIG_QZS,
        SYS_CMP => &MSM_SIG_BDS,
        SYS_IRN => &MSM_SIG_IRN,
        // SBAS shares the GPS signal layout
        _ => &MSM_SIG_GPS,
    };
    if idx < tab.len() {
        tab[idx]
    } else {
        NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_glo_wavelength() {
        // channel 0 is the base frequency
        assert!(approx_eq!(f64, glo_wavelength_l1(0), CLIGHT / FREQ1_GLO));
        let f = FREQ2_GLO + DFRQ2_GLO * -7.0;
        assert!(approx_eq!(f64, glo_wavelength_l2(-7), CLIGHT / f));
    }

    #[test]
    fn test_msm_sig_lookup() {
        let s = msm_sig(SYS_GPS, 1);
        assert_eq!(s.code, "1C");
        assert!(approx_eq!(f64, s.wl, WL_GPS_L1));
        // reserved slot
        assert!(msm_sig(SYS_GPS, 0).code.is_empty());
        // GLONASS FDMA placeholders
        assert_eq!(msm_sig(SYS_GLO, 1).wl, 0.0);
        assert_eq!(msm_sig(SYS_GLO, 7).wl, 1.0);
        // SBAS uses the GPS table
        assert_eq!(msm_sig(SYS_SBS, 22).code, "5Q");
    }
}
