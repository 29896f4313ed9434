pub mod bits;
pub mod crc;
pub mod frame;

mod eph;
mod msm;
mod obs;
mod sta;

use log::{debug, warn};
use once_cell::sync::Lazy;
use std::mem::take;
use std::sync::Mutex;
use thiserror::Error;

use crate::basic::var::{AntInfo, AntRefPoint, Eph, FrqObs, GTime, Geph, Nav, RecInfo, SatObs, Seph};
use frame::Framer;

pub use obs::lti2sec;

pub const MSM_NUMSIG: usize = 32;
pub const MSM_NUMSAT: usize = 64;
pub const MSM_NUMCELL: usize = 96; // arbitrary cell limit

#[derive(Error, Debug)]
pub enum Error {
    #[error("read past end of message")]
    BufferOverrun,
}

/// GLONASS frequency channel numbers, indexed by slot number - 1.
///
/// Entries hold 100 + k so that 0 means "unknown". Filled by 1012/1020
/// and MSM5/7 extended info, and shared between all decoder instances.
static GLO_FREQ: Lazy<Mutex<[i32; MSM_NUMSAT]>> = Lazy::new(|| Mutex::new([0; MSM_NUMSAT]));

/// read the stored channel entry (100 + k, or 0 if unknown) for a slot
pub fn glo_freq_get(slot: usize) -> i32 {
    if slot == 0 || slot > MSM_NUMSAT {
        return 0;
    }
    GLO_FREQ.lock().map(|t| t[slot - 1]).unwrap_or(0)
}

/// record the channel number k for a slot
pub fn glo_freq_set(slot: usize, k: i32) {
    if slot == 0 || slot > MSM_NUMSAT {
        return;
    }
    if let Ok(mut t) = GLO_FREQ.lock() {
        t[slot - 1] = 100 + k;
    }
}

/// sink for decoded broadcast ephemerides
///
/// QZSS and IRNSS records arrive through `on_gps_eph`, as they share the
/// Keplerian `Eph` shape; the satellite number tells the systems apart.
pub trait EphSink {
    fn on_gps_eph(&mut self, _eph: &Eph) {}
    fn on_glo_eph(&mut self, _geph: &Geph) {}
    fn on_gal_eph(&mut self, _eph: &Eph) {}
    fn on_sbs_eph(&mut self, _seph: &Seph) {}
    fn on_bds_eph(&mut self, _eph: &Eph) {}
}

/// handler for SSR frames (1057-1068, 1240-1270, 4076); the content is
/// decoded outside of this crate
pub trait SsrDecoder {
    /// returns true when the frame produced output
    fn decode(&mut self, sta_id: &str, frame: &[u8]) -> bool;
}

/// station id source for file replay, where the id can change mid-stream
pub trait RawFile {
    fn sta_id(&self) -> String;
}

/// RTCM3 stream decoder.
///
/// Feed raw bytes through [`Decoder::decode`]; completed observation
/// epochs accumulate in `obs_list`, ephemerides in `nav` (and the
/// optional sink), station metadata in the remaining lists.
pub struct Decoder {
    sta_id: String,
    framer: Framer,
    raw_file: Option<Box<dyn RawFile>>,
    ssr: Option<Box<dyn SsrDecoder>>,
    sink: Option<Box<dyn EphSink>>,
    diag_sink: Option<Box<dyn FnMut(&str)>>,
    current_time: GTime,
    current_obs: Vec<SatObs>,
    /// completed observation epochs, one inner list per epoch
    pub obs_list: Vec<Vec<SatObs>>,
    /// decoded broadcast ephemerides
    pub nav: Nav,
    /// antenna reference points (msg 1005/1006)
    pub ant_list: Vec<AntRefPoint>,
    /// antenna descriptors (msg 1007/1008/1033)
    pub ant_descriptors: Vec<AntInfo>,
    /// receiver descriptors (msg 1033)
    pub rec_descriptors: Vec<RecInfo>,
    /// message numbers of all successfully framed messages
    pub type_list: Vec<u16>,
}

impl Decoder {
    pub fn new(sta_id: &str) -> Self {
        Decoder {
            sta_id: sta_id.to_string(),
            framer: Framer::new(),
            raw_file: None,
            ssr: None,
            sink: None,
            diag_sink: None,
            current_time: GTime::default(),
            current_obs: Vec::new(),
            obs_list: Vec::new(),
            nav: Nav::new(),
            ant_list: Vec::new(),
            ant_descriptors: Vec::new(),
            rec_descriptors: Vec::new(),
            type_list: Vec::new(),
        }
    }

    pub fn sta_id(&self) -> &str {
        &self.sta_id
    }

    pub fn set_sta_id(&mut self, sta_id: &str) {
        self.sta_id = sta_id.to_string();
    }

    pub fn set_raw_file(&mut self, src: Box<dyn RawFile>) {
        self.raw_file = Some(src);
    }

    pub fn set_eph_sink(&mut self, sink: Box<dyn EphSink>) {
        self.sink = Some(sink);
    }

    pub fn set_ssr_handler(&mut self, handler: Box<dyn SsrDecoder>) {
        self.ssr = Some(handler);
    }

    pub fn set_diagnostic(&mut self, sink: Box<dyn FnMut(&str)>) {
        self.diag_sink = Some(sink);
    }

    /// Decode a chunk of the input stream.
    ///
    /// Returns true when at least one observation epoch or ephemeris was
    /// produced during this call. Frame and semantic errors never escape;
    /// malformed frames are consumed and skipped.
    pub fn decode(&mut self, mut buffer: &[u8]) -> bool {
        let mut decoded = false;

        loop {
            let n = self.framer.feed(buffer);
            buffer = &buffer[n..];
            let mut progressed = n > 0;

            while let Some((id, msg)) = self.framer.next_message() {
                progressed = true;
                // the station id may change across a replayed file
                if let Some(src) = &self.raw_file {
                    self.sta_id = src.sta_id();
                }
                self.type_list.push(id);
                match self.dispatch(id, &msg) {
                    Ok(d) => decoded |= d,
                    Err(e) => {
                        warn!("{}: block {} dropped: {}", self.sta_id, id, e);
                    }
                }
            }

            if buffer.is_empty() || !progressed {
                break;
            }
        }
        decoded
    }

    fn dispatch(&mut self, id: u16, msg: &[u8]) -> Result<bool, Error> {
        // SSR data is handled by a sub-decoder outside of this crate
        if (1057..=1068).contains(&id) || (1240..=1270).contains(&id) || id == 4076 {
            if let Some(ssr) = self.ssr.as_mut() {
                return Ok(ssr.decode(&self.sta_id, msg));
            }
            return Ok(false);
        }
        if (1070..=1237).contains(&id) {
            return self.decode_msm(msg);
        }
        match id {
            1001 | 1003 | 1009 | 1011 => {
                self.diag(&format!(
                    "{}: block {} contains partial data, ignored",
                    self.sta_id, id
                ));
                Ok(false)
            }
            1002 | 1004 => self.decode_gps_obs(msg),
            1010 | 1012 => self.decode_glo_obs(msg),
            1019 => self.decode_gps_eph(msg),
            1020 => self.decode_glo_eph(msg),
            1041 => self.decode_irn_eph(msg),
            1042 => self.decode_bds_eph(msg),
            1043 => self.decode_sbs_eph(msg),
            1044 => self.decode_qzs_eph(msg),
            1045 | 1046 => self.decode_gal_eph(msg),
            1005 | 1006 => {
                self.decode_ant_pos(msg)?;
                Ok(false)
            }
            1007 | 1008 | 1033 => {
                self.decode_ant_rcv(msg)?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    pub(crate) fn diag(&mut self, msg: &str) {
        debug!("{}", msg);
        if let Some(f) = self.diag_sink.as_mut() {
            f(msg);
        }
    }

    /// flush the staged epoch when the observation time moves on;
    /// returns true when an epoch was emitted
    pub(crate) fn stage_time(&mut self, t: GTime) -> bool {
        let mut decoded = false;
        if self.current_time.valid() && t != self.current_time {
            let list = take(&mut self.current_obs);
            self.obs_list.push(list);
            decoded = true;
        }
        self.current_time = t;
        decoded
    }

    /// finish an observation block; a cleared sync flag closes the epoch
    pub(crate) fn end_block(&mut self, syncf: bool) -> bool {
        if syncf {
            return false;
        }
        let list = take(&mut self.current_obs);
        self.obs_list.push(list);
        self.current_time.reset();
        true
    }

    pub(crate) fn push_obs(&mut self, obs: SatObs) {
        self.current_obs.push(obs);
    }

    pub(crate) fn emit_gps_eph(&mut self, eph: Eph) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_gps_eph(&eph);
        }
        self.nav.add_eph(eph);
    }

    pub(crate) fn emit_gal_eph(&mut self, eph: Eph) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_gal_eph(&eph);
        }
        self.nav.add_eph(eph);
    }

    pub(crate) fn emit_bds_eph(&mut self, eph: Eph) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_bds_eph(&eph);
        }
        self.nav.add_eph(eph);
    }

    pub(crate) fn emit_glo_eph(&mut self, geph: Geph) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_glo_eph(&geph);
        }
        self.nav.add_geph(geph);
    }

    pub(crate) fn emit_sbs_eph(&mut self, seph: Seph) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_sbs_eph(&seph);
        }
        self.nav.add_seph(seph);
    }
}

/// build a frequency observation with just the signal code set
pub(crate) fn new_frq_obs(code: &str) -> FrqObs {
    FrqObs {
        rnx_type2ch: code.to_string(),
        ..FrqObs::default()
    }
}
