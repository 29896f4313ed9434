use crate::basic::code::{glo_wavelength_l1, glo_wavelength_l2, msm_sig};
use crate::basic::sat::satno;
use crate::basic::time::{bdt_tow2gpst, glot2gpst, tow2gpst};
use crate::basic::var::*;
use crate::decode::bits::BitReader;
use crate::decode::obs::lti2sec;
use crate::decode::{glo_freq_get, glo_freq_set, new_frq_obs, Decoder, Error, MSM_NUMCELL};

impl Decoder {
    /// MSM observations (msg 1071-1137)
    ///
    /// Sub-type (last digit) 4/6 carry full pseudorange and phase, 5/7 add
    /// doppler; 1-3 carry partial data and are skipped. Which cells are
    /// present is driven by the satellite, signal and cell masks.
    pub(crate) fn decode_msm(&mut self, msg: &[u8]) -> Result<bool, Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);

        let msg_type = br.get_bits(12)? as u16;
        br.skip(12)?; // station id
        let sys = match msg_type {
            1071..=1077 => SYS_GPS,
            1081..=1087 => SYS_GLO,
            1091..=1097 => SYS_GAL,
            1101..=1107 => SYS_SBS,
            1111..=1117 => SYS_QZS,
            1121..=1127 => SYS_CMP,
            1131..=1137 => SYS_IRN,
            _ => return Ok(false),
        };

        let t = if sys == SYS_CMP {
            bdt_tow2gpst(br.get_bits(30)? as f64)
        } else if sys == SYS_GLO {
            br.skip(3)?; // day of week
            glot2gpst(br.get_bits(27)? as f64)
        } else {
            tow2gpst(br.get_bits(30)? as f64)
        };
        let mut decoded = self.stage_time(t);

        let syncf = br.get_bits(1)? == 1;
        let subtype = (msg_type % 10) as usize;

        if (4..=7).contains(&subtype) {
            // IOD, time offset, clock steering, external clock,
            // smoothing indicator and interval
            br.skip(3 + 7 + 2 + 2 + 1 + 3)?;
            let satmask = br.get_bits(64)?;
            let nsat = satmask.count_ones() as usize;
            let sigmask = br.get_bits(32)?;
            let nsig = sigmask.count_ones() as usize;
            let ncell = nsat * nsig;
            // the cell mask can be wider than a single read
            let cellmask: u128 = if ncell > 128 {
                br.skip(ncell)?;
                0
            } else if ncell > 64 {
                (br.get_bits(ncell - 64)? as u128) << 64 | br.get_bits(64)? as u128
            } else {
                br.get_bits(ncell)? as u128
            };

            // satellite data, in wire order (satellite mask MSB first)
            let mut rrint = vec![0i64; nsat];
            let mut rrmod = vec![0.0f64; nsat];
            let mut rdop = vec![0i64; nsat];
            let mut extsat = vec![15u64; nsat];
            match subtype {
                4 | 6 => {
                    for v in rrint.iter_mut() {
                        *v = br.get_bits(8)? as i64;
                    }
                    for v in rrmod.iter_mut() {
                        *v = br.get_float(10, 1.0 / 1024.0)?;
                    }
                }
                _ => {
                    for v in rrint.iter_mut() {
                        *v = br.get_bits(8)? as i64;
                    }
                    for v in extsat.iter_mut() {
                        *v = br.get_bits(4)?;
                    }
                    for v in rrmod.iter_mut() {
                        *v = br.get_float(10, 1.0 / 1024.0)?;
                    }
                    for v in rdop.iter_mut() {
                        *v = br.get_bits_signed(14)?;
                    }
                }
            }

            if ncell > MSM_NUMCELL {
                self.diag(&format!(
                    "{}: block {} exceeds {} cells ({}), dropped",
                    self.sta_id, msg_type, MSM_NUMCELL, ncell
                ));
                return Ok(decoded | self.end_block(syncf));
            }

            let cell = |p: usize| cellmask >> (ncell - 1 - p) & 1 == 1;

            // signal data, parallel arrays in wire order
            let mut psr = vec![0.0f64; ncell];
            let mut cp = vec![0.0f64; ncell];
            let mut ll = vec![0u32; ncell];
            let mut cnr = vec![0.0f64; ncell];
            let mut dop = vec![0.0f64; ncell];

            if subtype == 4 || subtype == 5 {
                for p in 0..ncell {
                    if cell(p) {
                        psr[p] = br.get_float_signed(15, P2_24)?;
                    }
                }
                for p in 0..ncell {
                    if cell(p) {
                        cp[p] = br.get_float_signed(22, P2_29)?;
                    }
                }
            } else {
                for p in 0..ncell {
                    if cell(p) {
                        psr[p] = br.get_float_signed(20, P2_29)?;
                    }
                }
                for p in 0..ncell {
                    if cell(p) {
                        cp[p] = br.get_float_signed(24, P2_31)?;
                    }
                }
            }
            let llbits = if subtype >= 6 { 10 } else { 4 };
            for p in 0..ncell {
                if cell(p) {
                    ll[p] = br.get_bits(llbits)? as u32;
                }
            }
            for p in 0..ncell {
                if cell(p) {
                    br.skip(1)?; // half cycle ambiguity indicator
                }
            }
            for p in 0..ncell {
                if cell(p) {
                    cnr[p] = match subtype {
                        4 | 5 => br.get_bits(6)? as f64,
                        _ => br.get_float(10, P2_4)?,
                    };
                }
            }
            if subtype == 5 || subtype == 7 {
                for p in 0..ncell {
                    if cell(p) {
                        dop[p] = br.get_float_signed(15, 0.0001)?;
                    }
                }
            }

            // walk the masks from their most significant bits downwards
            let slots: Vec<usize> = (0..64)
                .rev()
                .filter(|b| satmask >> b & 1 == 1)
                .map(|b| 64 - b)
                .collect();
            let sigs: Vec<usize> = (0..32)
                .rev()
                .filter(|b| sigmask >> b & 1 == 1)
                .map(|b| 32 - b)
                .collect();

            for (si, &slot) in slots.iter().enumerate() {
                let sat = match sys {
                    SYS_SBS => satno(SYS_SBS, slot + 119),
                    SYS_QZS => satno(SYS_QZS, slot + MINPRNQZS - 1),
                    _ => satno(sys, slot),
                };
                let mut cur = SatObs {
                    sat,
                    time: t,
                    msg_type,
                    obs: Vec::new(),
                };

                for (gi, &sigid) in sigs.iter().enumerate() {
                    let p = si * nsig + gi;
                    if !cell(p) {
                        continue;
                    }
                    let tab = msm_sig(sys, sigid - 1);
                    let mut wl = tab.wl;
                    let mut code = tab.code;
                    if sys == SYS_GLO {
                        // FDMA wavelength depends on the frequency channel,
                        // known from the extended info or an earlier
                        // 1012/1020 block
                        let mut k = glo_freq_get(slot);
                        if extsat[si] < 14 {
                            k = 100 + extsat[si] as i32 - 7;
                            glo_freq_set(slot, extsat[si] as i32 - 7);
                        }
                        if k != 0 {
                            if wl == 0.0 {
                                wl = glo_wavelength_l1(k - 100);
                            } else if wl == 1.0 {
                                wl = glo_wavelength_l2(k - 100);
                            }
                        } else if wl <= 1.0 {
                            code = "";
                        }
                    }
                    if code.is_empty() {
                        continue;
                    }

                    let mut frq = new_frq_obs(code);
                    let rough = (rrmod[si] + rrint[si] as f64) * RANGE_MS;
                    if psr[p] > -1.0 / (1 << 10) as f64 {
                        frq.code = Some(psr[p] * RANGE_MS + rough);
                    }
                    if cp[p] > -1.0 / (1 << 8) as f64 {
                        frq.phase = Some((cp[p] * RANGE_MS + rough) / wl);
                        frq.lock_time_indicator = ll[p];
                        let lt = lti2sec(msg_type, ll[p]);
                        if lt >= 0.0 {
                            frq.lock_time = Some(lt);
                        }
                    }
                    frq.snr = Some(cnr[p]);
                    if (subtype == 5 || subtype == 7) && dop[p] > -1.6384 {
                        frq.doppler = Some(-(dop[p] + rdop[si] as f64) / wl);
                    }
                    cur.obs.push(frq);
                }
                if cur.sat != 0 && !cur.obs.is_empty() {
                    self.push_obs(cur);
                }
            }
        } else {
            self.diag(&format!(
                "{}: block {} contains partial data, ignored",
                self.sta_id, msg_type
            ));
        }

        decoded |= self.end_block(syncf);
        Ok(decoded)
    }
}
