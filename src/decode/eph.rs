use nalgebra::Vector3;

use crate::basic::sat::satno;
use crate::basic::time::{
    bdt2gpst, bdt2time, glot2gpst, gpst2time, time2gpst, timeget, tod2gpst, tow2gpst, utc2gpst,
};
use crate::basic::var::*;
use crate::decode::bits::BitReader;
use crate::decode::{glo_freq_set, Decoder, Error};

impl Decoder {
    /// GPS ephemeris (msg 1019)
    pub(crate) fn decode_gps_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 67 {
            self.diag(&format!(
                "{}: block 1019 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut eph = Eph {
            ttr: utc2gpst(timeget()),
            ..Eph::default()
        };
        let prn = br.get_bits(6)? as usize;
        eph.sat = satno(SYS_GPS, prn);
        let mut week = br.get_bits(10)? as i32;
        eph.sva = br.get_bits(4)? as i32;
        eph.code = br.get_bits(2)? as i32;
        eph.idot = br.get_float_signed(14, SC2RAD * P2_43)?;
        eph.iode = br.get_bits(8)? as i32;
        let toc = (br.get_bits(16)? << 4) as f64;
        eph.toc = tow2gpst(toc * 1000.0);
        eph.f2 = br.get_float_signed(8, P2_55)?;
        eph.f1 = br.get_float_signed(16, P2_43)?;
        eph.f0 = br.get_float_signed(22, P2_31)?;
        eph.iodc = br.get_bits(10)? as i32;
        eph.crs = br.get_float_signed(16, P2_5)?;
        eph.deln = br.get_float_signed(16, SC2RAD * P2_43)?;
        eph.m0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cuc = br.get_float_signed(16, P2_29)?;
        eph.e = br.get_float(32, P2_33)?;
        eph.cus = br.get_float_signed(16, P2_29)?;
        let sqrt_a = br.get_float(32, P2_19)?;
        if sqrt_a < 1000.0 {
            self.diag(&format!(
                "{}: block 1019 (G{:02}) sqrt_a {:.3}, rejected",
                self.sta_id, prn, sqrt_a
            ));
            return Ok(false);
        }
        eph.a = sqrt_a * sqrt_a;
        eph.toes = (br.get_bits(16)? << 4) as f64;
        eph.toe = tow2gpst(eph.toes * 1000.0);
        let mut toe_week = 0;
        time2gpst(eph.toe, Some(&mut toe_week));
        // the HOW week is modulo 1024, the TOE week carries the rollovers
        week += (toe_week as f64 / 1024.0).floor() as i32 * 1024;
        if toe_week > week + 1 || toe_week < week - 1 {
            return Ok(false);
        }
        eph.week = toe_week;
        eph.cic = br.get_float_signed(16, P2_29)?;
        eph.omg0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cis = br.get_float_signed(16, P2_29)?;
        eph.i0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.crc = br.get_float_signed(16, P2_5)?;
        eph.omg = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omgd = br.get_float_signed(24, SC2RAD * P2_43)?;
        eph.tgd[0] = br.get_float_signed(8, P2_31)?;
        eph.svh = br.get_bits(6)? as i32;
        eph.flag = br.get_bits(1)? as i32;
        let fit_flag = br.get_bits(1)?;
        eph.fit = if fit_flag != 0 { 0.0 } else { 4.0 };

        if eph.sat == 0 {
            return Ok(false);
        }
        self.emit_gps_eph(eph);
        Ok(true)
    }

    /// QZSS ephemeris (msg 1044)
    pub(crate) fn decode_qzs_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 67 {
            self.diag(&format!(
                "{}: block 1044 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut eph = Eph {
            ttr: utc2gpst(timeget()),
            ..Eph::default()
        };
        let prn = br.get_bits(4)? as usize;
        eph.sat = satno(SYS_QZS, prn + MINPRNQZS - 1);
        let toc = (br.get_bits(16)? << 4) as f64;
        eph.toc = tow2gpst(toc * 1000.0);
        eph.f2 = br.get_float_signed(8, P2_55)?;
        eph.f1 = br.get_float_signed(16, P2_43)?;
        eph.f0 = br.get_float_signed(22, P2_31)?;
        eph.iode = br.get_bits(8)? as i32;
        eph.crs = br.get_float_signed(16, P2_5)?;
        eph.deln = br.get_float_signed(16, SC2RAD * P2_43)?;
        eph.m0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cuc = br.get_float_signed(16, P2_29)?;
        eph.e = br.get_float(32, P2_33)?;
        eph.cus = br.get_float_signed(16, P2_29)?;
        let sqrt_a = br.get_float(32, P2_19)?;
        if sqrt_a < 1000.0 {
            self.diag(&format!(
                "{}: block 1044 (J{:02}) sqrt_a {:.3}, rejected",
                self.sta_id, prn, sqrt_a
            ));
            return Ok(false);
        }
        eph.a = sqrt_a * sqrt_a;
        eph.toes = (br.get_bits(16)? << 4) as f64;
        eph.toe = tow2gpst(eph.toes * 1000.0);
        let mut toe_week = 0;
        time2gpst(eph.toe, Some(&mut toe_week));
        eph.cic = br.get_float_signed(16, P2_29)?;
        eph.omg0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cis = br.get_float_signed(16, P2_29)?;
        eph.i0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.crc = br.get_float_signed(16, P2_5)?;
        eph.omg = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omgd = br.get_float_signed(24, SC2RAD * P2_43)?;
        eph.idot = br.get_float_signed(14, SC2RAD * P2_43)?;
        eph.code = br.get_bits(2)? as i32;
        let mut week = br.get_bits(10)? as i32;
        week += (toe_week as f64 / 1024.0).floor() as i32 * 1024;
        if toe_week > week + 1 || toe_week < week - 1 {
            return Ok(false);
        }
        eph.week = toe_week;
        eph.sva = br.get_bits(4)? as i32;
        eph.svh = br.get_bits(6)? as i32;
        eph.tgd[0] = br.get_float_signed(8, P2_31)?;
        eph.iodc = br.get_bits(10)? as i32;
        let _fit_flag = br.get_bits(1)?;
        eph.fit = 2.0;

        if eph.sat == 0 {
            return Ok(false);
        }
        self.emit_gps_eph(eph);
        Ok(true)
    }

    /// IRNSS ephemeris (msg 1041)
    pub(crate) fn decode_irn_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 67 {
            self.diag(&format!(
                "{}: block 1041 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut eph = Eph {
            ttr: utc2gpst(timeget()),
            ..Eph::default()
        };
        let prn = br.get_bits(6)? as usize;
        eph.sat = satno(SYS_IRN, prn);
        let mut week = br.get_bits(10)? as i32;
        eph.f0 = br.get_float_signed(22, P2_31)?;
        eph.f1 = br.get_float_signed(16, P2_43)?;
        eph.f2 = br.get_float_signed(8, P2_55)?;
        eph.sva = br.get_bits(4)? as i32;
        let toc = (br.get_bits(16)? << 4) as f64;
        eph.toc = tow2gpst(toc * 1000.0);
        eph.tgd[0] = br.get_float_signed(8, P2_31)?;
        eph.deln = br.get_float_signed(22, SC2RAD * P2_41)?;
        // IODEC covers both orbit and clock
        eph.iode = br.get_bits(8)? as i32;
        eph.iodc = eph.iode;
        br.skip(10)?;
        let l5_flag = br.get_bits(1)?;
        let s_flag = br.get_bits(1)?;
        eph.svh = (l5_flag << 1 | s_flag) as i32;
        eph.cuc = br.get_float_signed(15, P2_28)?;
        eph.cus = br.get_float_signed(15, P2_28)?;
        eph.cic = br.get_float_signed(15, P2_28)?;
        eph.cis = br.get_float_signed(15, P2_28)?;
        eph.crc = br.get_float_signed(15, P2_4)?;
        eph.crs = br.get_float_signed(15, P2_4)?;
        eph.idot = br.get_float_signed(14, SC2RAD * P2_43)?;
        br.skip(2)?;
        eph.m0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.toes = (br.get_bits(16)? << 4) as f64;
        eph.toe = tow2gpst(eph.toes * 1000.0);
        let mut toe_week = 0;
        time2gpst(eph.toe, Some(&mut toe_week));
        week += (toe_week as f64 / 1024.0).floor() as i32 * 1024;
        if toe_week > week + 1 || toe_week < week - 1 {
            return Ok(false);
        }
        eph.week = toe_week;
        eph.e = br.get_float(32, P2_33)?;
        let sqrt_a = br.get_float(32, P2_19)?;
        if sqrt_a < 1000.0 {
            self.diag(&format!(
                "{}: block 1041 (I{:02}) sqrt_a {:.3}, rejected",
                self.sta_id, prn, sqrt_a
            ));
            return Ok(false);
        }
        eph.a = sqrt_a * sqrt_a;
        eph.omg0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omg = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omgd = br.get_float_signed(22, SC2RAD * P2_41)?;
        eph.i0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        br.skip(2)?;

        if eph.sat == 0 {
            return Ok(false);
        }
        self.emit_gps_eph(eph);
        Ok(true)
    }

    /// SBAS ephemeris (msg 1043)
    pub(crate) fn decode_sbs_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 35 {
            self.diag(&format!(
                "{}: block 1043 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut seph = Seph {
            tof: utc2gpst(timeget()),
            ..Seph::default()
        };
        let prn = br.get_bits(6)? as usize;
        seph.sat = satno(SYS_SBS, prn + MINPRNSBS);
        // IODN
        br.skip(8)?;
        let t0 = (br.get_bits(13)? << 4) as f64;
        seph.t0 = tod2gpst(t0 * 1000.0);
        seph.sva = br.get_bits(4)? as i32;
        seph.pos[0] = br.get_float_signed(30, 0.08)?;
        seph.pos[1] = br.get_float_signed(30, 0.08)?;
        seph.pos[2] = br.get_float_signed(25, 0.4)?;
        if Vector3::from(seph.pos).norm() < 1.0 {
            self.diag(&format!(
                "{}: block 1043 (S{:02}) zero position, rejected",
                self.sta_id,
                prn + 20
            ));
            return Ok(false);
        }
        seph.vel[0] = br.get_float_signed(17, 0.000625)?;
        seph.vel[1] = br.get_float_signed(17, 0.000625)?;
        seph.vel[2] = br.get_float_signed(18, 0.004)?;
        seph.acc[0] = br.get_float_signed(10, 0.0000125)?;
        seph.acc[1] = br.get_float_signed(10, 0.0000125)?;
        seph.acc[2] = br.get_float_signed(10, 0.0000625)?;
        seph.af0 = br.get_float_signed(12, P2_31)?;
        seph.af1 = br.get_float_signed(8, P2_40)?;
        seph.svh = 0;

        if seph.sat == 0 {
            return Ok(false);
        }
        self.emit_sbs_eph(seph);
        Ok(true)
    }

    /// Galileo I/NAV and F/NAV ephemeris (msg 1046/1045)
    pub(crate) fn decode_gal_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        let msg_type = br.get_bits(12)? as u16;
        let inav = msg_type == 1046;
        if (inav && msg.len() != 69) || (!inav && msg.len() != 68) {
            self.diag(&format!(
                "{}: block {} unexpected length {}",
                self.sta_id,
                msg_type,
                msg.len()
            ));
            return Ok(false);
        }

        let mut eph = Eph {
            ttr: utc2gpst(timeget()),
            ..Eph::default()
        };
        let prn = br.get_bits(6)? as usize;
        eph.sat = satno(SYS_GAL, prn);
        let week = br.get_bits(12)? as i32; // Galileo week, no rollover yet
        eph.week = week + 1024;
        eph.iode = br.get_bits(10)? as i32;
        eph.sva = br.get_bits(8)? as i32;
        eph.idot = br.get_float_signed(14, SC2RAD * P2_43)?;
        let toc = br.get_bits(14)? as f64 * 60.0;
        eph.toc = gpst2time(eph.week, toc);
        eph.f2 = br.get_float_signed(6, P2_59)?;
        eph.f1 = br.get_float_signed(21, P2_46)?;
        eph.f0 = br.get_float_signed(31, P2_34)?;
        eph.crs = br.get_float_signed(16, P2_5)?;
        eph.deln = br.get_float_signed(16, SC2RAD * P2_43)?;
        eph.m0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cuc = br.get_float_signed(16, P2_29)?;
        eph.e = br.get_float(32, P2_33)?;
        eph.cus = br.get_float_signed(16, P2_29)?;
        let sqrt_a = br.get_float(32, P2_19)?;
        eph.a = sqrt_a * sqrt_a;
        // the announced toe mirrors toc
        br.skip(14)?;
        eph.toes = toc;
        eph.toe = eph.toc;
        eph.cic = br.get_float_signed(16, P2_29)?;
        eph.omg0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cis = br.get_float_signed(16, P2_29)?;
        eph.i0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.crc = br.get_float_signed(16, P2_5)?;
        eph.omg = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omgd = br.get_float_signed(24, SC2RAD * P2_43)?;
        eph.tgd[0] = br.get_float_signed(10, P2_32)?;
        if inav {
            eph.tgd[1] = br.get_float_signed(10, P2_32)?;
            let e5b_hs = br.get_bits(2)?;
            let e5b_dav = br.get_bits(1)?;
            let e1_hs = br.get_bits(2)?;
            let e1_dav = br.get_bits(1)?;
            if e5b_hs != e1_hs {
                self.diag(&format!(
                    "{}: block 1046 (E{:02}) SHS E5b {} E1-B {} inconsistent, rejected",
                    self.sta_id, prn, e5b_hs, e1_hs
                ));
                return Ok(false);
            }
            if (eph.tgd[0] == 0.0 && eph.tgd[1].abs() > 1E-9)
                || (eph.tgd[1] == 0.0 && eph.tgd[0].abs() > 1E-9)
            {
                self.diag(&format!(
                    "{}: block 1046 (E{:02}) BGD {:E}/{:E} inconsistent, rejected",
                    self.sta_id, prn, eph.tgd[0], eph.tgd[1]
                ));
                return Ok(false);
            }
            eph.svh = ((e5b_hs << 7) | (e5b_dav << 6) | (e1_hs << 1) | e1_dav) as i32;
            eph.code = (1 << 0) | (1 << 2) | (1 << 9); // I/NAV E1-B / E5b
        } else {
            let e5a_hs = br.get_bits(2)?;
            let e5a_dav = br.get_bits(1)?;
            eph.svh = ((e5a_hs << 4) | (e5a_dav << 3)) as i32;
            eph.code = (1 << 1) | (1 << 8); // F/NAV E5a-I
        }
        if sqrt_a < 1000.0 {
            self.diag(&format!(
                "{}: block {} (E{:02}) sqrt_a {:.3}, rejected",
                self.sta_id, msg_type, prn, sqrt_a
            ));
            return Ok(false);
        }

        if eph.sat == 0 {
            return Ok(false);
        }
        self.emit_gal_eph(eph);
        Ok(true)
    }

    /// BeiDou ephemeris (msg 1042)
    pub(crate) fn decode_bds_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 70 {
            self.diag(&format!(
                "{}: block 1042 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut eph = Eph {
            ttr: utc2gpst(timeget()),
            ..Eph::default()
        };
        let prn = br.get_bits(6)? as usize;
        eph.sat = satno(SYS_CMP, prn);
        let week = br.get_bits(13)? as i32;
        eph.week = week;
        eph.sva = br.get_bits(4)? as i32;
        eph.idot = br.get_float_signed(14, SC2RAD * P2_43)?;
        eph.iode = br.get_bits(5)? as i32; // AODE
        let toc = (br.get_bits(17)? << 3) as f64;
        eph.toc = bdt2gpst(bdt2time(week, toc));
        eph.f2 = br.get_float_signed(11, P2_66)?;
        eph.f1 = br.get_float_signed(22, P2_50)?;
        eph.f0 = br.get_float_signed(24, P2_33)?;
        eph.iodc = br.get_bits(5)? as i32; // AODC
        eph.crs = br.get_float_signed(18, P2_6)?;
        eph.deln = br.get_float_signed(16, SC2RAD * P2_43)?;
        eph.m0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cuc = br.get_float_signed(18, P2_31)?;
        eph.e = br.get_float(32, P2_33)?;
        eph.cus = br.get_float_signed(18, P2_31)?;
        let sqrt_a = br.get_float(32, P2_19)?;
        if sqrt_a < 1000.0 {
            self.diag(&format!(
                "{}: block 1042 (C{:02}) sqrt_a {:.3}, rejected",
                self.sta_id, prn, sqrt_a
            ));
            return Ok(false);
        }
        eph.a = sqrt_a * sqrt_a;
        eph.toes = (br.get_bits(17)? << 3) as f64;
        eph.toe = bdt2gpst(bdt2time(week, eph.toes));
        eph.cic = br.get_float_signed(18, P2_31)?;
        eph.omg0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.cis = br.get_float_signed(18, P2_31)?;
        eph.i0 = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.crc = br.get_float_signed(18, P2_6)?;
        eph.omg = br.get_float_signed(32, SC2RAD * P2_31)?;
        eph.omgd = br.get_float_signed(24, SC2RAD * P2_43)?;
        eph.tgd[0] = br.get_float_signed(10, 1E-10)?;
        eph.tgd[1] = br.get_float_signed(10, 1E-10)?;
        eph.svh = br.get_bits(1)? as i32; // SatH1
        // GEO satellites broadcast D2, the rest D1
        let max_geo_i = 10.0 / 180.0 * SC2RAD;
        eph.flag = if eph.i0 > max_geo_i { 1 } else { 2 };

        if eph.sat == 0 {
            return Ok(false);
        }
        self.emit_bds_eph(eph);
        Ok(true)
    }

    /// GLONASS ephemeris (msg 1020)
    pub(crate) fn decode_glo_eph(&mut self, msg: &[u8]) -> Result<bool, Error> {
        if msg.len() != 51 {
            self.diag(&format!(
                "{}: block 1020 unexpected length {}",
                self.sta_id,
                msg.len()
            ));
            return Ok(false);
        }
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        br.skip(12)?;

        let mut geph = Geph::default();
        let prn = br.get_bits(6)? as usize;
        geph.sat = satno(SYS_GLO, prn);
        let freq = br.get_bits(5)? as i32;
        geph.frq = freq - 7;
        br.skip(1)?; // almanac health
        let alm_avail = br.get_bits(1)?;
        if alm_avail == 0 {
            self.diag(&format!(
                "{}: block 1020 (R{:02}) almanac health unavailable, rejected",
                self.sta_id, prn
            ));
            return Ok(false);
        }
        br.skip(2)?; // P1
        let mut tk = br.get_bits(5)? * 3600;
        tk += br.get_bits(6)? * 60;
        tk += br.get_bits(1)? * 30;
        geph.tof = glot2gpst(tk as f64 * 1000.0);
        geph.svh = br.get_bits(1)? as i32; // Bn MSB
        br.skip(1)?; // P2
        let tb = br.get_bits(7)?;
        geph.iode = tb as i32;
        geph.toe = glot2gpst(tb as f64 * 900.0 * 1000.0);

        geph.vel[0] = br.get_float_sign_magnitude(24, P2_20)? * 1E3;
        geph.pos[0] = br.get_float_sign_magnitude(27, P2_11)? * 1E3;
        geph.acc[0] = br.get_float_sign_magnitude(5, P2_30)? * 1E3;
        geph.vel[1] = br.get_float_sign_magnitude(24, P2_20)? * 1E3;
        geph.pos[1] = br.get_float_sign_magnitude(27, P2_11)? * 1E3;
        geph.acc[1] = br.get_float_sign_magnitude(5, P2_30)? * 1E3;
        geph.vel[2] = br.get_float_sign_magnitude(24, P2_20)? * 1E3;
        geph.pos[2] = br.get_float_sign_magnitude(27, P2_11)? * 1E3;
        geph.acc[2] = br.get_float_sign_magnitude(5, P2_30)? * 1E3;
        br.skip(1)?; // P3
        geph.gamn = br.get_float_sign_magnitude(11, P2_40)?;
        br.skip(3)?; // P, ln (third string)
        geph.taun = -br.get_float_sign_magnitude(22, P2_30)?;
        geph.dtaun = br.get_float_sign_magnitude(5, P2_30)?;
        geph.age = br.get_bits(5)? as i32; // E
        br.skip(1)?; // P4
        geph.sva = br.get_bits(4)? as i32; // Ft
        let nt = br.get_bits(11)?;
        if nt == 0 {
            self.diag(&format!(
                "{}: block 1020 (R{:02}) NT is zero, rejected",
                self.sta_id, prn
            ));
            return Ok(false);
        }
        br.skip(2)?; // M
        let add_avail = br.get_bits(1)?;
        if add_avail == 0 {
            self.diag(&format!(
                "{}: block 1020 (R{:02}) additional data unavailable, rejected",
                self.sta_id, prn
            ));
            return Ok(false);
        }
        // Na, tau_c, N4, tau_gps, ln (fifth string)
        br.skip(11 + 32 + 5 + 22 + 1)?;

        if Vector3::from(geph.pos).norm() < 1.0 {
            self.diag(&format!(
                "{}: block 1020 (R{:02}) zero position, rejected",
                self.sta_id, prn
            ));
            return Ok(false);
        }
        if Vector3::from(geph.vel).norm() < 1.0 {
            self.diag(&format!(
                "{}: block 1020 (R{:02}) zero velocity, rejected",
                self.sta_id, prn
            ));
            return Ok(false);
        }
        if geph.sat == 0 {
            return Ok(false);
        }
        // record the channel number for MSM wavelength resolution
        glo_freq_set(prn, geph.frq);

        self.emit_glo_eph(geph);
        Ok(true)
    }
}
