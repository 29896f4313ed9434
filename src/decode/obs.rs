use crate::basic::code::{glo_wavelength_l1, glo_wavelength_l2, WL_GPS_L1, WL_GPS_L2};
use crate::basic::sat::satno;
use crate::basic::time::{glot2gpst, tow2gpst};
use crate::basic::var::*;
use crate::decode::bits::BitReader;
use crate::decode::{glo_freq_set, new_frq_obs, Decoder, Error};

/// Convert a lock time indicator to lock time in seconds.
///
/// The table depends on the carrying message: legacy observations use the
/// 7-bit indicator, MSM2-5 the 4-bit one and MSM6/7 the 10-bit
/// high-resolution one. Returns -1.0 for an unknown format or indicator.
pub fn lti2sec(msg_type: u16, lti: u32) -> f64 {
    if (1001..=1004).contains(&msg_type) || (1009..=1012).contains(&msg_type) {
        return match lti {
            0..=23 => lti as f64,
            24..=47 => (lti * 2 - 24) as f64,
            48..=71 => (lti * 4 - 120) as f64,
            72..=95 => (lti * 8 - 408) as f64,
            96..=119 => (lti * 16 - 1176) as f64,
            120..=126 => (lti * 32 - 3096) as f64,
            127 => 937.0,
            _ => -1.0,
        };
    }
    match msg_type % 10 {
        2..=5 => match lti {
            0 => 0.0,
            1..=15 => 0.032 * (1u32 << (lti - 1)) as f64,
            _ => -1.0,
        },
        6 | 7 => {
            let i = lti as u64;
            let ms = match i {
                0..=63 => i,
                64..=95 => 2 * i - 64,
                96..=127 => 4 * i - 256,
                128..=159 => 8 * i - 768,
                160..=191 => 16 * i - 2048,
                192..=223 => 32 * i - 5120,
                224..=255 => 64 * i - 12288,
                256..=287 => 128 * i - 28672,
                288..=319 => 256 * i - 65536,
                320..=351 => 512 * i - 147456,
                352..=383 => 1024 * i - 327680,
                384..=415 => 2048 * i - 720896,
                416..=447 => 4096 * i - 1572864,
                448..=479 => 8192 * i - 3407872,
                480..=511 => 16384 * i - 7340032,
                512..=543 => 32768 * i - 15728640,
                544..=575 => 65536 * i - 33554432,
                576..=607 => 131072 * i - 71303168,
                608..=639 => 262144 * i - 150994944,
                640..=671 => 524288 * i - 318767104,
                672..=703 => 1048576 * i - 671088640,
                704 => 2097152 * i - 1409286144,
                _ => return -1.0,
            };
            ms as f64 * 1E-3
        }
        _ => -1.0,
    }
}

impl Decoder {
    /// legacy GPS observations (msg 1002/1004)
    pub(crate) fn decode_gps_obs(&mut self, msg: &[u8]) -> Result<bool, Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);

        let msg_type = br.get_bits(12)? as u16;
        br.skip(12)?; // station id
        let tow = br.get_bits(30)? as f64;
        let t = tow2gpst(tow);
        let mut decoded = self.stage_time(t);

        let syncf = br.get_bits(1)? == 1;
        let nsat = br.get_bits(5)?;
        br.skip(4)?; // smoothing indicator and interval

        for _ in 0..nsat {
            let sv = br.get_bits(6)? as usize;
            let sat = if sv < 40 {
                satno(SYS_GPS, sv)
            } else {
                satno(SYS_SBS, sv + 80)
            };
            let mut cur = SatObs {
                sat,
                time: t,
                msg_type,
                obs: Vec::new(),
            };

            // L1
            let code = br.get_bits(1)?;
            let mut frq = new_frq_obs(if code != 0 { "1W" } else { "1C" });
            let l1range = br.get_bits(24)? as f64;
            let diff = br.get_bits_signed(20)?;
            if (diff & ((1 << 20) - 1)) != 0x80000 {
                frq.code = Some(l1range * 0.02);
                frq.phase = Some((l1range * 0.02 + diff as f64 * 0.0005) / WL_GPS_L1);
            }
            frq.lock_time_indicator = br.get_bits(7)? as u32;
            let lt = lti2sec(msg_type, frq.lock_time_indicator);
            if lt >= 0.0 && frq.phase.is_some() {
                frq.lock_time = Some(lt);
            }
            let mut amb = 0.0;
            if msg_type == 1002 || msg_type == 1004 {
                amb = br.get_bits(8)? as f64;
                if amb > 0.0 {
                    if let Some(c) = frq.code.as_mut() {
                        *c += amb * PRUNIT_GPS;
                    }
                    if let Some(p) = frq.phase.as_mut() {
                        *p += amb * PRUNIT_GPS / WL_GPS_L1;
                    }
                }
                let cnr = br.get_bits(8)?;
                if cnr != 0 {
                    frq.snr = Some(cnr as f64 * 0.25);
                }
            }
            cur.obs.push(frq);

            // L2
            if msg_type == 1003 || msg_type == 1004 {
                let code = br.get_bits(2)?;
                let mut frq = new_frq_obs(match code {
                    1 => "2P",
                    2 | 3 => "2W",
                    _ => "2X",
                });
                let diff = br.get_bits_signed(14)?;
                if (diff & ((1 << 14) - 1)) != 0x2000 {
                    frq.code = Some(l1range * 0.02 + diff as f64 * 0.02 + amb * PRUNIT_GPS);
                }
                let diff = br.get_bits_signed(20)?;
                if (diff & ((1 << 20) - 1)) != 0x80000 {
                    frq.phase = Some(
                        (l1range * 0.02 + diff as f64 * 0.0005 + amb * PRUNIT_GPS) / WL_GPS_L2,
                    );
                }
                frq.lock_time_indicator = br.get_bits(7)? as u32;
                let lt = lti2sec(msg_type, frq.lock_time_indicator);
                if lt >= 0.0 && frq.phase.is_some() {
                    frq.lock_time = Some(lt);
                }
                if msg_type == 1004 {
                    let cnr = br.get_bits(8)?;
                    if cnr != 0 {
                        frq.snr = Some(cnr as f64 * 0.25);
                    }
                }
                cur.obs.push(frq);
            }
            if cur.sat != 0 {
                self.push_obs(cur);
            }
        }
        decoded |= self.end_block(syncf);
        Ok(decoded)
    }

    /// legacy GLONASS observations (msg 1010/1012)
    pub(crate) fn decode_glo_obs(&mut self, msg: &[u8]) -> Result<bool, Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);

        let msg_type = br.get_bits(12)? as u16;
        br.skip(12)?; // station id
        let tk = br.get_bits(27)? as f64;
        let t = glot2gpst(tk);
        let mut decoded = self.stage_time(t);

        let syncf = br.get_bits(1)? == 1;
        let nsat = br.get_bits(5)?;
        br.skip(4)?; // smoothing indicator and interval

        for _ in 0..nsat {
            let sv = br.get_bits(6)? as usize;
            let sat = satno(SYS_GLO, sv);
            let mut cur = SatObs {
                sat,
                time: t,
                msg_type,
                obs: Vec::new(),
            };

            let code = br.get_bits(1)?;
            let freq = br.get_bits(5)? as i32;
            let k = freq - 7;
            // record the channel number for MSM wavelength resolution
            glo_freq_set(sv, k);

            // L1
            let mut frq = new_frq_obs(if code != 0 { "1P" } else { "1C" });
            let l1range = br.get_bits(25)? as f64;
            let diff = br.get_bits_signed(20)?;
            if (diff & ((1 << 20) - 1)) != 0x80000 {
                frq.code = Some(l1range * 0.02);
                frq.phase = Some((l1range * 0.02 + diff as f64 * 0.0005) / glo_wavelength_l1(k));
            }
            frq.lock_time_indicator = br.get_bits(7)? as u32;
            let lt = lti2sec(msg_type, frq.lock_time_indicator);
            if lt >= 0.0 && frq.phase.is_some() {
                frq.lock_time = Some(lt);
            }
            let mut amb = 0.0;
            if msg_type == 1010 || msg_type == 1012 {
                amb = br.get_bits(7)? as f64;
                if amb > 0.0 {
                    if let Some(c) = frq.code.as_mut() {
                        *c += amb * PRUNIT_GLO;
                    }
                    if let Some(p) = frq.phase.as_mut() {
                        *p += amb * PRUNIT_GLO / glo_wavelength_l1(k);
                    }
                }
                let cnr = br.get_bits(8)?;
                if cnr != 0 {
                    frq.snr = Some(cnr as f64 * 0.25);
                }
            }
            cur.obs.push(frq);

            // L2
            if msg_type == 1011 || msg_type == 1012 {
                let code = br.get_bits(2)?;
                let mut frq = new_frq_obs(if code == 0 { "2C" } else { "2P" });
                let diff = br.get_bits_signed(14)?;
                if (diff & ((1 << 14) - 1)) != 0x2000 {
                    frq.code = Some(l1range * 0.02 + diff as f64 * 0.02 + amb * PRUNIT_GLO);
                }
                let diff = br.get_bits_signed(20)?;
                if (diff & ((1 << 20) - 1)) != 0x80000 {
                    frq.phase = Some(
                        (l1range * 0.02 + diff as f64 * 0.0005 + amb * PRUNIT_GLO)
                            / glo_wavelength_l2(k),
                    );
                }
                frq.lock_time_indicator = br.get_bits(7)? as u32;
                let lt = lti2sec(msg_type, frq.lock_time_indicator);
                if lt >= 0.0 && frq.phase.is_some() {
                    frq.lock_time = Some(lt);
                }
                if msg_type == 1012 {
                    let cnr = br.get_bits(8)?;
                    if cnr != 0 {
                        frq.snr = Some(cnr as f64 * 0.25);
                    }
                }
                cur.obs.push(frq);
            }
            if cur.sat != 0 {
                self.push_obs(cur);
            }
        }
        decoded |= self.end_block(syncf);
        Ok(decoded)
    }
}
