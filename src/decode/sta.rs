use crate::basic::var::{AntInfo, AntRefPoint, RecInfo};
use crate::decode::bits::BitReader;
use crate::decode::{Decoder, Error};

const MAXDESLEN: usize = 264;

/// length-prefixed ASCII string (8-bit count)
fn get_string(br: &mut BitReader) -> Result<String, Error> {
    let n = br.get_bits(8)? as usize;
    let mut bytes = Vec::with_capacity(n);
    for _ in 0..n {
        bytes.push(br.get_bits(8)? as u8);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl Decoder {
    /// antenna and receiver descriptors (msg 1007/1008/1033)
    pub(crate) fn decode_ant_rcv(&mut self, msg: &[u8]) -> Result<(), Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        let msg_type = br.get_bits(12)? as u16;
        br.skip(12)?; // station id

        let antenna = get_string(&mut br)?;
        // consecutive duplicates are suppressed
        if antenna.len() < MAXDESLEN
            && self
                .ant_descriptors
                .last()
                .map(|a| a.descriptor != antenna)
                .unwrap_or(true)
        {
            self.ant_descriptors.push(AntInfo {
                descriptor: antenna,
                serial: String::new(),
            });
        }
        br.skip(8)?; // antenna setup id

        if msg_type == 1008 || msg_type == 1033 {
            let serial = get_string(&mut br)?;
            if serial.len() < MAXDESLEN {
                if let Some(last) = self.ant_descriptors.last_mut() {
                    last.serial = serial;
                }
            }
        }

        if msg_type == 1033 {
            let receiver = get_string(&mut br)?;
            let firmware = get_string(&mut br)?;
            let serial = get_string(&mut br)?;
            if receiver.len() < MAXDESLEN
                && self
                    .rec_descriptors
                    .last()
                    .map(|r| r.descriptor != receiver)
                    .unwrap_or(true)
            {
                self.rec_descriptors.push(RecInfo {
                    descriptor: receiver,
                    firmware,
                    serial,
                });
            }
        }
        Ok(())
    }

    /// antenna reference point position (msg 1005/1006)
    pub(crate) fn decode_ant_pos(&mut self, msg: &[u8]) -> Result<(), Error> {
        let mut br = BitReader::new(&msg[3..msg.len() - 3]);
        let msg_type = br.get_bits(12)? as u16;
        // station id, ITRF year and system indicators
        br.skip(22)?;
        let x = br.get_bits_signed(38)? as f64 * 1E-4;
        br.skip(2)?; // single receiver oscillator, reserved
        let y = br.get_bits_signed(38)? as f64 * 1E-4;
        br.skip(2)?; // quarter cycle indicator
        let z = br.get_bits_signed(38)? as f64 * 1E-4;
        let height = if msg_type == 1006 {
            Some(br.get_bits(16)? as f64 * 1E-4)
        } else {
            None
        };
        self.ant_list.push(AntRefPoint {
            x,
            y,
            z,
            height,
            msg_type,
        });
        Ok(())
    }
}
