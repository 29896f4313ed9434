use std::sync::{Arc, Mutex};

use float_cmp::approx_eq;

use rtcmdec::basic::code::{glo_wavelength_l1, WL_GPS_L1};
use rtcmdec::basic::sat::{satno, satno2id};
use rtcmdec::basic::time::{time2gpst, timeget, utc2gpst};
use rtcmdec::basic::var::{Eph, RANGE_MS, SYS_GLO, SYS_GPS};
use rtcmdec::decode::crc::crc24q;
use rtcmdec::decode::{glo_freq_get, glo_freq_set, lti2sec, EphSink};
use rtcmdec::Decoder;

/// MSB-first bit writer used to build synthetic messages
struct BitWriter {
    buf: Vec<u8>,
    nbits: usize,
}

impl BitWriter {
    fn new(msg_type: u16) -> Self {
        let mut w = BitWriter {
            buf: Vec::new(),
            nbits: 0,
        };
        w.put_bits(msg_type as u64, 12);
        w
    }

    fn put_bits(&mut self, v: u64, n: usize) {
        for i in (0..n).rev() {
            if self.nbits % 8 == 0 {
                self.buf.push(0);
            }
            if (v >> i) & 1 == 1 {
                let idx = self.nbits / 8;
                self.buf[idx] |= 1 << (7 - self.nbits % 8);
            }
            self.nbits += 1;
        }
    }

    fn put_bits_signed(&mut self, v: i64, n: usize) {
        let mask = if n >= 64 { u64::MAX } else { (1u64 << n) - 1 };
        self.put_bits(v as u64 & mask, n);
    }

    fn put_sign_magnitude(&mut self, v: i64, n: usize) {
        if v < 0 {
            self.put_bits(1, 1);
            self.put_bits((-v) as u64, n - 1);
        } else {
            self.put_bits(0, 1);
            self.put_bits(v as u64, n - 1);
        }
    }

    /// wrap the payload into a 0xD3 frame with CRC-24Q
    fn frame(self) -> Vec<u8> {
        let payload = self.buf;
        let mut f = vec![
            0xD3,
            (payload.len() >> 8) as u8 & 0x03,
            payload.len() as u8,
        ];
        f.extend_from_slice(&payload);
        let crc = crc24q(&f);
        f.extend_from_slice(&[(crc >> 16) as u8, (crc >> 8) as u8, crc as u8]);
        f
    }
}

/// legacy 1004 message with one GPS satellite and an invalid L2 block
fn msg_1004(tow_ms: u64, sync: u64, sv: u64, l1range: u64, cnr: u64) -> Vec<u8> {
    let mut w = BitWriter::new(1004);
    w.put_bits(0, 12); // station id
    w.put_bits(tow_ms, 30);
    w.put_bits(sync, 1);
    w.put_bits(1, 5); // one satellite
    w.put_bits(0, 4);

    w.put_bits(sv, 6);
    w.put_bits(0, 1); // C/A
    w.put_bits(l1range, 24);
    w.put_bits_signed(0, 20); // phase - code
    w.put_bits(5, 7); // lock time indicator
    w.put_bits(0, 8); // no ambiguity
    w.put_bits(cnr, 8);
    // L2 with both sentinels set
    w.put_bits(0, 2);
    w.put_bits(0x2000, 14);
    w.put_bits(0x80000, 20);
    w.put_bits(0, 7);
    w.put_bits(0, 8);
    w.frame()
}

fn current_gps_week_tow() -> (i32, f64) {
    let now = utc2gpst(timeget());
    let mut week = 0;
    let tow = time2gpst(now, Some(&mut week));
    (week, tow)
}

/// GPS ephemeris message passing all validation rules
fn msg_1019(prn: u64) -> Vec<u8> {
    let (week, tow) = current_gps_week_tow();
    let toe_field = (tow as u64 / 16).min(604784 / 16);

    let mut w = BitWriter::new(1019);
    w.put_bits(prn, 6);
    w.put_bits(week as u64 % 1024, 10);
    w.put_bits(2, 4); // ura index
    w.put_bits(0, 2); // codes on L2
    w.put_bits_signed(-50, 14); // idot
    w.put_bits(17, 8); // iode
    w.put_bits(toe_field, 16); // toc
    w.put_bits_signed(0, 8); // af2
    w.put_bits_signed(-20, 16); // af1
    w.put_bits_signed(12345, 22); // af0
    w.put_bits(17, 10); // iodc
    w.put_bits_signed(100, 16); // crs
    w.put_bits_signed(200, 16); // delta n
    w.put_bits_signed(-1000000, 32); // m0
    w.put_bits_signed(300, 16); // cuc
    w.put_bits(100000, 32); // e
    w.put_bits_signed(-300, 16); // cus
    w.put_bits(2702009139, 32); // sqrt(a) ~ 5153.6
    w.put_bits(toe_field, 16); // toe
    w.put_bits_signed(10, 16); // cic
    w.put_bits_signed(2000000, 32); // omega0
    w.put_bits_signed(-10, 16); // cis
    w.put_bits_signed(500000000, 32); // i0
    w.put_bits_signed(-100, 16); // crc
    w.put_bits_signed(300000, 32); // omega
    w.put_bits_signed(-4000, 24); // omega dot
    w.put_bits_signed(5, 8); // tgd
    w.put_bits(0, 6); // health
    w.put_bits(0, 1); // L2 P flag
    w.put_bits(0, 1); // fit flag
    w.frame()
}

/// GLONASS ephemeris message; pos/vel in km and km/s
fn msg_1020(prn: u64, freq_raw: u64, pos_km: f64, vel_kms: f64) -> Vec<u8> {
    let mut w = BitWriter::new(1020);
    w.put_bits(prn, 6);
    w.put_bits(freq_raw, 5);
    w.put_bits(0, 1); // almanac health
    w.put_bits(1, 1); // almanac health available
    w.put_bits(0, 2); // P1
    w.put_bits(10, 5); // tk hours
    w.put_bits(30, 6); // tk minutes
    w.put_bits(0, 1); // tk half minute
    w.put_bits(0, 1); // Bn
    w.put_bits(0, 1); // P2
    w.put_bits(40, 7); // tb
    for _ in 0..3 {
        w.put_sign_magnitude((vel_kms * (1 << 20) as f64) as i64, 24);
        w.put_sign_magnitude((pos_km * (1 << 11) as f64) as i64, 27);
        w.put_sign_magnitude(0, 5);
    }
    w.put_bits(0, 1); // P3
    w.put_sign_magnitude(-100, 11); // gamma
    w.put_bits(0, 3); // P, ln
    w.put_sign_magnitude(5000, 22); // tau
    w.put_sign_magnitude(0, 5); // delta tau
    w.put_bits(0, 5); // E
    w.put_bits(0, 1); // P4
    w.put_bits(1, 4); // Ft
    w.put_bits(700, 11); // Nt
    w.put_bits(0, 2); // M
    w.put_bits(1, 1); // additional data available
    w.put_bits(0, 11); // Na
    w.put_sign_magnitude(0, 32); // tau c
    w.put_bits(6, 5); // N4
    w.put_sign_magnitude(0, 22); // tau gps
    w.put_bits(0, 1); // ln
    w.frame()
}

/// MSM message with the given satellites and signal ids, all cells present
fn msg_msm(
    msg_type: u16,
    tow_ms: u64,
    sync: u64,
    sats: &[u64],
    sigs: &[u64],
    ext_info: u64,
) -> Vec<u8> {
    let subtype = msg_type % 10;
    let mut w = BitWriter::new(msg_type);
    w.put_bits(0, 12); // station id
    if (1081..=1087).contains(&msg_type) {
        w.put_bits(0, 3); // day of week
        w.put_bits(tow_ms, 27);
    } else {
        w.put_bits(tow_ms, 30);
    }
    w.put_bits(sync, 1);
    w.put_bits(0, 3 + 7 + 2 + 2 + 1 + 3);

    let mut satmask = 0u64;
    for &s in sats {
        satmask |= 1 << (64 - s);
    }
    w.put_bits(satmask, 64);
    let mut sigmask = 0u64;
    for &g in sigs {
        sigmask |= 1 << (32 - g);
    }
    w.put_bits(sigmask, 32);
    let ncell = sats.len() * sigs.len();
    for _ in 0..ncell {
        w.put_bits(1, 1); // all cells present
    }

    // satellite data
    for _ in sats {
        w.put_bits(67, 8); // integer ms
    }
    if subtype == 5 || subtype == 7 {
        for _ in sats {
            w.put_bits(ext_info, 4);
        }
    }
    for _ in sats {
        w.put_bits(512, 10); // 0.5 ms
    }
    if subtype == 5 || subtype == 7 {
        for _ in sats {
            w.put_bits_signed(100, 14); // rough range rate
        }
    }

    // signal data
    for _ in 0..ncell {
        if subtype >= 6 {
            w.put_bits_signed(1000, 20);
        } else {
            w.put_bits_signed(1000, 15);
        }
    }
    for _ in 0..ncell {
        if subtype >= 6 {
            w.put_bits_signed(2000, 24);
        } else {
            w.put_bits_signed(2000, 22);
        }
    }
    for _ in 0..ncell {
        w.put_bits(100, if subtype >= 6 { 10 } else { 4 });
    }
    for _ in 0..ncell {
        w.put_bits(0, 1); // half cycle
    }
    for _ in 0..ncell {
        if subtype >= 6 {
            w.put_bits(640, 10); // 40 dB-Hz
        } else {
            w.put_bits(40, 6);
        }
    }
    if subtype == 5 || subtype == 7 {
        for _ in 0..ncell {
            w.put_bits_signed(-3000, 15);
        }
    }
    w.frame()
}

#[test]
fn test_1004_single_satellite() {
    let mut dec = Decoder::new("TEST");
    let decoded = dec.decode(&msg_1004(3600_000, 0, 5, 20_000_000, 160));
    assert!(decoded);

    assert_eq!(dec.obs_list.len(), 1);
    let epoch = &dec.obs_list[0];
    assert_eq!(epoch.len(), 1);
    let sat = &epoch[0];
    assert_eq!(sat.sat, satno(SYS_GPS, 5));
    assert_eq!(sat.msg_type, 1004);
    assert_eq!(sat.obs.len(), 2);

    let l1 = &sat.obs[0];
    assert_eq!(l1.rnx_type2ch, "1C");
    assert!(approx_eq!(f64, l1.code.unwrap(), 400000.0, epsilon = 1E-6));
    assert!(approx_eq!(
        f64,
        l1.phase.unwrap(),
        400000.0 / WL_GPS_L1,
        epsilon = 1E-5
    ));
    assert!(approx_eq!(f64, l1.snr.unwrap(), 40.0));
    assert_eq!(l1.lock_time, Some(lti2sec(1004, 5)));

    // both L2 sentinels were set
    let l2 = &sat.obs[1];
    assert!(l2.code.is_none());
    assert!(l2.phase.is_none());
    assert!(l2.snr.is_none());
}

#[test]
fn test_sync_flag_groups_one_epoch() {
    let mut dec = Decoder::new("TEST");
    assert!(!dec.decode(&msg_1004(7200_000, 1, 3, 20_000_000, 160)));
    assert!(dec.obs_list.is_empty());
    assert!(dec.decode(&msg_1004(7200_000, 0, 9, 20_000_000, 160)));

    assert_eq!(dec.obs_list.len(), 1);
    let epoch = &dec.obs_list[0];
    assert_eq!(epoch.len(), 2);
    assert_eq!(epoch[0].sat, satno(SYS_GPS, 3));
    assert_eq!(epoch[1].sat, satno(SYS_GPS, 9));
    assert_eq!(epoch[0].time, epoch[1].time);
}

#[test]
fn test_epoch_change_flushes() {
    let mut dec = Decoder::new("TEST");
    dec.decode(&msg_1004(7200_000, 1, 3, 20_000_000, 160));
    dec.decode(&msg_1004(7201_000, 0, 9, 20_000_000, 160));

    assert_eq!(dec.obs_list.len(), 2);
    assert_eq!(dec.obs_list[0].len(), 1);
    assert_eq!(dec.obs_list[0][0].sat, satno(SYS_GPS, 3));
    assert_eq!(dec.obs_list[1].len(), 1);
    assert_eq!(dec.obs_list[1][0].sat, satno(SYS_GPS, 9));
    // the two epochs differ
    assert_ne!(dec.obs_list[0][0].time, dec.obs_list[1][0].time);
}

#[test]
fn test_1019_with_resync() {
    let mut stream = vec![0xFF, 0xFF];
    stream.extend_from_slice(&msg_1019(3));

    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&stream));

    assert_eq!(dec.nav.n, 1);
    let eph = &dec.nav.eph[0];
    assert_eq!(eph.sat, satno(SYS_GPS, 3));
    assert_eq!(satno2id(eph.sat), "G03");
    assert_eq!(eph.iode, 17);
    assert_eq!(eph.fit, 4.0);
    let (week, _) = current_gps_week_tow();
    assert_eq!(eph.week, week);
    assert!(eph.a > 2.5E7);
    assert_eq!(dec.type_list, vec![1019]);
}

#[test]
fn test_1020_zero_position_rejected() {
    let mut dec = Decoder::new("TEST");
    assert!(!dec.decode(&msg_1020(2, 12, 0.0, 2.5)));
    assert_eq!(dec.nav.ng, 0);

    // and a healthy one passes
    assert!(dec.decode(&msg_1020(9, 12, 15000.0, 2.5)));
    assert_eq!(dec.nav.ng, 1);
    let geph = &dec.nav.geph[0];
    assert_eq!(geph.sat, satno(SYS_GLO, 9));
    assert_eq!(geph.frq, 5);
    assert_eq!(geph.iode, 40);
    assert!(approx_eq!(f64, geph.pos[0], 15000.0E3));
    // the shared slot table was updated
    assert_eq!(glo_freq_get(9), 105);
}

/// Galileo I/NAV ephemeris; health values selectable for the reject path
fn msg_1046(prn: u64, e5b_hs: u64, e1_hs: u64) -> Vec<u8> {
    let mut w = BitWriter::new(1046);
    w.put_bits(prn, 6);
    w.put_bits(1200, 12); // galileo week
    w.put_bits(50, 10); // iod nav
    w.put_bits(107, 8); // sisa index
    w.put_bits_signed(-40, 14); // idot
    w.put_bits(600, 14); // toc (x 60 s)
    w.put_bits_signed(0, 6); // af2
    w.put_bits_signed(-300, 21); // af1
    w.put_bits_signed(40000, 31); // af0
    w.put_bits_signed(80, 16); // crs
    w.put_bits_signed(150, 16); // delta n
    w.put_bits_signed(-2000000, 32); // m0
    w.put_bits_signed(250, 16); // cuc
    w.put_bits(80000, 32); // e
    w.put_bits_signed(-250, 16); // cus
    w.put_bits(2852126720, 32); // sqrt(a) ~ 5440.4
    w.put_bits(600, 14); // toe
    w.put_bits_signed(12, 16); // cic
    w.put_bits_signed(1500000, 32); // omega0
    w.put_bits_signed(-12, 16); // cis
    w.put_bits_signed(520000000, 32); // i0
    w.put_bits_signed(-90, 16); // crc
    w.put_bits_signed(250000, 32); // omega
    w.put_bits_signed(-3500, 24); // omega dot
    w.put_bits_signed(12, 10); // bgd e1/e5a
    w.put_bits_signed(14, 10); // bgd e1/e5b
    w.put_bits(e5b_hs, 2);
    w.put_bits(0, 1); // e5b data validity
    w.put_bits(e1_hs, 2);
    w.put_bits(0, 1); // e1-b data validity
    w.frame()
}

#[test]
fn test_1046_galileo_inav() {
    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&msg_1046(12, 0, 0)));

    assert_eq!(dec.nav.n, 1);
    let eph = &dec.nav.eph[0];
    assert_eq!(satno2id(eph.sat), "E12");
    assert_eq!(eph.week, 1200 + 1024);
    assert_eq!(eph.iode, 50);
    assert_eq!(eph.sva, 107);
    assert_eq!(eph.svh, 0);
    assert!(eph.a > 2.5E7);
    assert!(approx_eq!(f64, eph.toes, 36000.0));
    assert!(eph.tgd[1] != 0.0);
}

#[test]
fn test_1046_health_mismatch_rejected() {
    let mut dec = Decoder::new("TEST");
    assert!(!dec.decode(&msg_1046(12, 1, 0)));
    assert_eq!(dec.nav.n, 0);
}

#[test]
fn test_1043_sbas_ephemeris() {
    let mut w = BitWriter::new(1043);
    w.put_bits(13, 6); // S33
    w.put_bits(0, 8); // iodn
    w.put_bits(2700, 13); // t0 (x 16 s)
    w.put_bits(3, 4); // ura index
    w.put_bits_signed(300_000_000, 30); // x: 24000 km
    w.put_bits_signed(-150_000_000, 30); // y
    w.put_bits_signed(2_500_000, 25); // z: 1000 km
    w.put_bits_signed(1600, 17);
    w.put_bits_signed(-1600, 17);
    w.put_bits_signed(250, 18);
    w.put_bits_signed(80, 10);
    w.put_bits_signed(-80, 10);
    w.put_bits_signed(16, 10);
    w.put_bits_signed(100, 12); // af0
    w.put_bits_signed(-4, 8); // af1

    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&w.frame()));

    assert_eq!(dec.nav.ns, 1);
    let seph = &dec.nav.seph[0];
    assert_eq!(satno2id(seph.sat), "S33");
    assert!(approx_eq!(f64, seph.pos[0], 24_000_000.0, epsilon = 1E-3));
    assert!(approx_eq!(f64, seph.pos[2], 1_000_000.0, epsilon = 1E-3));
    assert_eq!(seph.sva, 3);
    assert!(seph.af0 > 0.0);
    assert!(seph.af1 < 0.0);
}

#[test]
fn test_msm7_two_satellites() {
    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&msg_msm(1077, 446_400_000, 0, &[5, 7], &[2], 15)));

    assert_eq!(dec.obs_list.len(), 1);
    let epoch = &dec.obs_list[0];
    assert_eq!(epoch.len(), 2);
    assert_eq!(epoch[0].sat, satno(SYS_GPS, 5));
    assert_eq!(epoch[1].sat, satno(SYS_GPS, 7));

    for sat in epoch {
        assert_eq!(sat.obs.len(), 1);
        let frq = &sat.obs[0];
        assert_eq!(frq.rnx_type2ch, "1C");
        let rough = 67.5 * RANGE_MS;
        let code = 1000.0 / (1u64 << 29) as f64 * RANGE_MS + rough;
        let phase = (2000.0 / (1u64 << 31) as f64 * RANGE_MS + rough) / WL_GPS_L1;
        assert!(approx_eq!(f64, frq.code.unwrap(), code));
        assert!(approx_eq!(f64, frq.phase.unwrap(), phase));
        assert!(approx_eq!(f64, frq.snr.unwrap(), 40.0));
        let doppler = -(-0.3 + 100.0) / WL_GPS_L1;
        assert!(approx_eq!(f64, frq.doppler.unwrap(), doppler, epsilon = 1E-9));
        assert_eq!(frq.lock_time, Some(lti2sec(1077, 100)));
    }
}

#[test]
fn test_glo_msm_wavelength_from_shared_table() {
    glo_freq_set(11, 3);

    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&msg_msm(1084, 43_200_000, 0, &[11], &[2], 15)));

    let epoch = dec.obs_list.last().unwrap();
    assert_eq!(epoch.len(), 1);
    let frq = &epoch[0].obs[0];
    assert_eq!(frq.rnx_type2ch, "1C");
    let rough = 67.5 * RANGE_MS;
    let phase = (2000.0 / (1u64 << 29) as f64 * RANGE_MS + rough) / glo_wavelength_l1(3);
    assert!(approx_eq!(f64, frq.phase.unwrap(), phase));
}

#[test]
fn test_glo_msm_ext_info_updates_table() {
    // MSM5 extended info carries the channel number: ext - 7
    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&msg_msm(1085, 43_200_000, 0, &[14], &[2], 9)));

    assert_eq!(glo_freq_get(14), 100 + 2);
    let epoch = dec.obs_list.last().unwrap();
    assert_eq!(epoch.len(), 1);
}

#[test]
fn test_glo_msm_unknown_slot_dropped() {
    let mut dec = Decoder::new("TEST");
    dec.decode(&msg_msm(1084, 43_200_000, 0, &[23], &[2], 15));

    // the lone satellite had no resolvable wavelength
    let epoch = dec.obs_list.last().unwrap();
    assert!(epoch.is_empty());
}

#[test]
fn test_msm4_cell_mask_beyond_64() {
    // 17 satellites x 4 signals = 68 cells
    let sats: Vec<u64> = (1..=17).collect();
    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&msg_msm(1074, 446_400_000, 0, &sats, &[2, 9, 16, 23], 15)));

    assert_eq!(dec.obs_list.len(), 1);
    let epoch = &dec.obs_list[0];
    assert_eq!(epoch.len(), 17);
    for sat in epoch {
        assert_eq!(sat.obs.len(), 4);
    }
    let codes: Vec<&str> = epoch[0].obs.iter().map(|f| f.rnx_type2ch.as_str()).collect();
    assert_eq!(codes, ["1C", "2P", "2L", "5Q"]);
    let frq = &epoch[16].obs[3];
    let code = 1000.0 / (1u64 << 24) as f64 * RANGE_MS + 67.5 * RANGE_MS;
    assert!(approx_eq!(f64, frq.code.unwrap(), code));
}

#[test]
fn test_msm_over_cell_limit_discarded() {
    // 25 satellites x 4 signals = 100 cells, beyond the 96-cell limit
    let sats: Vec<u64> = (1..=25).collect();
    let diags = Arc::new(Mutex::new(Vec::new()));
    let sink = diags.clone();
    let mut dec = Decoder::new("TEST");
    dec.set_diagnostic(Box::new(move |m| sink.lock().unwrap().push(m.to_string())));
    dec.decode(&msg_msm(1074, 446_400_000, 0, &sats, &[2, 9, 16, 23], 15));

    // the frame was consumed and counted, but no observation came out
    assert_eq!(dec.type_list, vec![1074]);
    let epoch = dec.obs_list.last().unwrap();
    assert!(epoch.is_empty());
    assert_eq!(diags.lock().unwrap().len(), 1);
    assert!(diags.lock().unwrap()[0].contains("cells"));
}

#[test]
fn test_chunked_feed_is_identical() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&msg_1004(7200_000, 1, 3, 20_000_000, 160));
    stream.extend_from_slice(&[0xAA, 0x55]); // garbage between frames
    stream.extend_from_slice(&msg_1004(7200_000, 0, 9, 20_000_000, 160));
    stream.extend_from_slice(&msg_1019(3));

    let mut one_shot = Decoder::new("TEST");
    one_shot.decode(&stream);

    let mut trickled = Decoder::new("TEST");
    for b in &stream {
        trickled.decode(std::slice::from_ref(b));
    }

    assert_eq!(one_shot.type_list, vec![1004, 1004, 1019]);
    assert_eq!(one_shot.type_list, trickled.type_list);
    assert_eq!(one_shot.obs_list.len(), trickled.obs_list.len());
    assert_eq!(one_shot.nav.n, trickled.nav.n);
    let a: Vec<usize> = one_shot.obs_list[0].iter().map(|o| o.sat).collect();
    let b: Vec<usize> = trickled.obs_list[0].iter().map(|o| o.sat).collect();
    assert_eq!(a, b);
}

#[test]
fn test_eph_sink_callback() {
    struct CountSink(Arc<Mutex<Vec<usize>>>);
    impl EphSink for CountSink {
        fn on_gps_eph(&mut self, eph: &Eph) {
            self.0.lock().unwrap().push(eph.sat);
        }
    }

    let sats = Arc::new(Mutex::new(Vec::new()));
    let mut dec = Decoder::new("TEST");
    dec.set_eph_sink(Box::new(CountSink(sats.clone())));
    dec.decode(&msg_1019(7));

    assert_eq!(*sats.lock().unwrap(), vec![satno(SYS_GPS, 7)]);
}

#[test]
fn test_antenna_receiver_descriptors() {
    let mut w = BitWriter::new(1033);
    w.put_bits(0, 12);
    for part in ["TRM59800.00 NONE", "1440912345"] {
        if part == "1440912345" {
            w.put_bits(0, 8); // setup id before the serial
        }
        w.put_bits(part.len() as u64, 8);
        for b in part.bytes() {
            w.put_bits(b as u64, 8);
        }
    }
    for part in ["SEPT POLARX5", "5.3.2", "3001234"] {
        w.put_bits(part.len() as u64, 8);
        for b in part.bytes() {
            w.put_bits(b as u64, 8);
        }
    }
    let frame = w.frame();

    let mut dec = Decoder::new("TEST");
    // feeding the same descriptor twice must not duplicate it
    dec.decode(&frame);
    dec.decode(&frame);

    assert_eq!(dec.ant_descriptors.len(), 1);
    assert_eq!(dec.ant_descriptors[0].descriptor, "TRM59800.00 NONE");
    assert_eq!(dec.ant_descriptors[0].serial, "1440912345");
    assert_eq!(dec.rec_descriptors.len(), 1);
    assert_eq!(dec.rec_descriptors[0].descriptor, "SEPT POLARX5");
    assert_eq!(dec.rec_descriptors[0].firmware, "5.3.2");
    assert_eq!(dec.rec_descriptors[0].serial, "3001234");
}

#[test]
fn test_antenna_reference_point() {
    let mut w = BitWriter::new(1006);
    w.put_bits(0, 12); // station id
    w.put_bits(0, 6); // itrf year
    w.put_bits(0, 4); // system indicators
    w.put_bits_signed(40_000_000_000, 38);
    w.put_bits(0, 2);
    w.put_bits_signed(-12_345_678, 38);
    w.put_bits(0, 2);
    w.put_bits_signed(48_000_000_000, 38);
    w.put_bits(15, 16);

    let mut dec = Decoder::new("TEST");
    dec.decode(&w.frame());

    assert_eq!(dec.ant_list.len(), 1);
    let arp = &dec.ant_list[0];
    assert_eq!(arp.msg_type, 1006);
    assert!(approx_eq!(f64, arp.x, 4_000_000.0, epsilon = 1E-6));
    assert!(approx_eq!(f64, arp.y, -1_234.5678, epsilon = 1E-6));
    assert!(approx_eq!(f64, arp.z, 4_800_000.0, epsilon = 1E-6));
    assert!(approx_eq!(f64, arp.height.unwrap(), 0.0015, epsilon = 1E-9));
}

#[test]
fn test_legacy_1012_updates_slot_table() {
    // one GLONASS satellite, slot 3, frequency channel raw 5 (k = -2)
    let mut w = BitWriter::new(1012);
    w.put_bits(0, 12);
    w.put_bits(43_200_000, 27); // tk
    w.put_bits(0, 1); // sync
    w.put_bits(1, 5);
    w.put_bits(0, 4);
    w.put_bits(3, 6); // slot
    w.put_bits(0, 1); // code
    w.put_bits(5, 5); // frequency channel + 7
    w.put_bits(10_000_000, 25);
    w.put_bits_signed(0, 20);
    w.put_bits(0, 7);
    w.put_bits(0, 7); // ambiguity
    w.put_bits(120, 8); // cnr
    w.put_bits(0, 2); // L2 code
    w.put_bits_signed(100, 14);
    w.put_bits_signed(-200, 20);
    w.put_bits(0, 7);
    w.put_bits(100, 8);

    let mut dec = Decoder::new("TEST");
    assert!(dec.decode(&w.frame()));

    assert_eq!(glo_freq_get(3), 100 - 2);
    let epoch = &dec.obs_list[0];
    assert_eq!(epoch.len(), 1);
    assert_eq!(epoch[0].sat, satno(SYS_GLO, 3));
    assert_eq!(epoch[0].obs.len(), 2);
    let l1 = &epoch[0].obs[0];
    assert_eq!(l1.rnx_type2ch, "1C");
    assert!(approx_eq!(f64, l1.code.unwrap(), 200_000.0, epsilon = 1E-6));
    assert!(approx_eq!(f64, l1.snr.unwrap(), 30.0));
    let l2 = &epoch[0].obs[1];
    assert_eq!(l2.rnx_type2ch, "2C");
    assert!(approx_eq!(
        f64,
        l2.code.unwrap(),
        200_000.0 + 100.0 * 0.02,
        epsilon = 1E-6
    ));
}

#[test]
fn test_partial_data_types_are_counted_only() {
    let mut w = BitWriter::new(1001);
    w.put_bits(0, 12);
    w.put_bits(3600_000, 30);
    w.put_bits(0, 1);
    w.put_bits(0, 5);
    w.put_bits(0, 4);

    let diags = Arc::new(Mutex::new(Vec::new()));
    let sink = diags.clone();
    let mut dec = Decoder::new("TEST");
    dec.set_diagnostic(Box::new(move |m| sink.lock().unwrap().push(m.to_string())));

    assert!(!dec.decode(&w.frame()));
    assert_eq!(dec.type_list, vec![1001]);
    assert!(dec.obs_list.is_empty());
    assert_eq!(diags.lock().unwrap().len(), 1);
}

#[test]
fn test_unknown_message_is_skipped() {
    let mut w = BitWriter::new(1230); // GLONASS biases, not decoded here
    w.put_bits(0, 12);
    w.put_bits(0, 40);

    let mut dec = Decoder::new("TEST");
    assert!(!dec.decode(&w.frame()));
    assert_eq!(dec.type_list, vec![1230]);
}
