use crate::basic::var::*;

/// convert satellite system+prn to satellite number
pub fn satno(sys: usize, prn: usize) -> usize {
    if prn == 0 {
        return 0;
    }

    match sys {
        SYS_GPS if (MINPRNGPS..=MAXPRNGPS).contains(&prn) => prn,
        SYS_GLO if (MINPRNGLO..=MAXPRNGLO).contains(&prn) => NSATGPS + prn,
        SYS_GAL if (MINPRNGAL..=MAXPRNGAL).contains(&prn) => NSATGPS + NSATGLO + prn,
        SYS_QZS if (MINPRNQZS..=MAXPRNQZS).contains(&prn) => {
            NSATGPS + NSATGLO + NSATGAL + prn - MINPRNQZS + 1
        }
        SYS_CMP if (MINPRNCMP..=MAXPRNCMP).contains(&prn) => {
            NSATGPS + NSATGLO + NSATGAL + NSATQZS + prn
        }
        SYS_IRN if (MINPRNIRN..=MAXPRNIRN).contains(&prn) => {
            NSATGPS + NSATGLO + NSATGAL + NSATQZS + NSATCMP + prn
        }
        SYS_SBS if (MINPRNSBS..=MAXPRNSBS).contains(&prn) => {
            NSATGPS + NSATGLO + NSATGAL + NSATQZS + NSATCMP + NSATIRN + prn - MINPRNSBS + 1
        }
        _ => 0,
    }
}

/// get satellite system
pub fn satsys(sat: usize) -> usize {
    if sat == 0 || sat > MAXSAT {
        SYS_NONE
    } else if sat <= NSATGPS {
        SYS_GPS
    } else if sat <= NSATGPS + NSATGLO {
        SYS_GLO
    } else if sat <= NSATGPS + NSATGLO + NSATGAL {
        SYS_GAL
    } else if sat <= NSATGPS + NSATGLO + NSATGAL + NSATQZS {
        SYS_QZS
    } else if sat <= NSATGPS + NSATGLO + NSATGAL + NSATQZS + NSATCMP {
        SYS_CMP
    } else if sat <= NSATGPS + NSATGLO + NSATGAL + NSATQZS + NSATCMP + NSATIRN {
        SYS_IRN
    } else {
        SYS_SBS
    }
}

/// convert satellite number to PRN
pub fn getprn(sat: usize) -> usize {
    if sat == 0 || sat > MAXSAT {
        return 0;
    }
    let mut prn = sat;
    if prn <= NSATGPS {
        return prn;
    }
    prn -= NSATGPS;
    if prn <= NSATGLO {
        return prn;
    }
    prn -= NSATGLO;
    if prn <= NSATGAL {
        return prn;
    }
    prn -= NSATGAL;
    if prn <= NSATQZS {
        return prn + MINPRNQZS - 1;
    }
    prn -= NSATQZS;
    if prn <= NSATCMP {
        return prn;
    }
    prn -= NSATCMP;
    if prn <= NSATIRN {
        return prn;
    }
    prn -= NSATIRN;
    prn + MINPRNSBS - 1
}

/// convert satellite number to satellite id
pub fn satno2id(sat: usize) -> String {
    let prn = getprn(sat);
    match satsys(sat) {
        SYS_GPS => format!("G{:02}", prn),
        SYS_GLO => format!("R{:02}", prn),
        SYS_GAL => format!("E{:02}", prn),
        SYS_QZS => format!("J{:02}", prn - MINPRNQZS + 1),
        SYS_CMP => format!("C{:02}", prn),
        SYS_IRN => format!("I{:02}", prn),
        SYS_SBS => format!("S{:02}", prn - 100),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satno_roundtrip() {
        for (sys, prn) in [
            (SYS_GPS, 1),
            (SYS_GPS, 32),
            (SYS_GLO, 5),
            (SYS_GAL, 36),
            (SYS_QZS, 193),
            (SYS_CMP, 63),
            (SYS_IRN, 14),
            (SYS_SBS, 120),
            (SYS_SBS, 158),
        ] {
            let sat = satno(sys, prn);
            assert_ne!(sat, 0, "sys {} prn {}", sys, prn);
            assert_eq!(satsys(sat), sys);
            assert_eq!(getprn(sat), prn);
        }
    }

    #[test]
    fn test_satno_out_of_range() {
        assert_eq!(satno(SYS_GPS, 0), 0);
        assert_eq!(satno(SYS_GPS, 33), 0);
        assert_eq!(satno(SYS_GLO, 28), 0);
        assert_eq!(satno(SYS_SBS, 119), 0);
    }

    #[test]
    fn test_satno2id() {
        assert_eq!(satno2id(satno(SYS_GPS, 5)), "G05");
        assert_eq!(satno2id(satno(SYS_GLO, 12)), "R12");
        assert_eq!(satno2id(satno(SYS_QZS, 193)), "J01");
        assert_eq!(satno2id(satno(SYS_SBS, 133)), "S33");
    }
}
