use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};

use chrono::Utc;
use clap::Parser;
use log::info;

use rtcmdec::basic::sat::satno2id;
use rtcmdec::basic::time::time2str;
use rtcmdec::Decoder;

#[derive(Parser, Debug)]
#[command(
    name = "rtcmdump",
    about = "Decode an RTCM3 stream and print observations, ephemerides and station info."
)]
struct Cli {
    /// Input RTCM3 file, "-" for stdin
    #[clap(short = 'i', long = "inp")]
    ifile: String,

    /// Station id used in diagnostics
    #[clap(short = 's', long = "sta", default_value = "FILE")]
    staid: String,

    /// Print every decoded observation
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut input: Box<dyn Read> = if cli.ifile == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(&cli.ifile).expect("unable to open input file"))
    };

    let mut decoder = Decoder::new(&cli.staid);
    decoder.set_diagnostic(Box::new(|m| eprintln!("{}", m)));

    info!("decoding {} at {}", cli.ifile, Utc::now().format("%Y/%m/%d %H:%M:%S"));

    let mut buf = [0u8; 4096];
    loop {
        let n = input.read(&mut buf).expect("read error");
        if n == 0 {
            break;
        }
        decoder.decode(&buf[..n]);
    }

    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    for &id in &decoder.type_list {
        *counts.entry(id).or_default() += 1;
    }
    println!("message types:");
    for (id, n) in &counts {
        println!("  {:4} x{}", id, n);
    }

    println!("observation epochs: {}", decoder.obs_list.len());
    if cli.verbose {
        for epoch in &decoder.obs_list {
            if let Some(first) = epoch.first() {
                println!("  {}", time2str(first.time));
            }
            for obs in epoch {
                let codes: Vec<&str> = obs.obs.iter().map(|f| f.rnx_type2ch.as_str()).collect();
                println!("    {} [{}]", satno2id(obs.sat), codes.join(" "));
            }
        }
    }

    println!(
        "ephemerides: {} keplerian, {} glonass, {} sbas",
        decoder.nav.n, decoder.nav.ng, decoder.nav.ns
    );
    for eph in &decoder.nav.eph {
        println!("  {} toe {}", satno2id(eph.sat), time2str(eph.toe));
    }
    for geph in &decoder.nav.geph {
        println!("  {} toe {} frq {}", satno2id(geph.sat), time2str(geph.toe), geph.frq);
    }
    for seph in &decoder.nav.seph {
        println!("  {} t0 {}", satno2id(seph.sat), time2str(seph.t0));
    }

    for ant in &decoder.ant_descriptors {
        println!("antenna: {} {}", ant.descriptor, ant.serial);
    }
    for rec in &decoder.rec_descriptors {
        println!("receiver: {} {} {}", rec.descriptor, rec.firmware, rec.serial);
    }
    for arp in &decoder.ant_list {
        println!(
            "ref point: {:.4} {:.4} {:.4}{}",
            arp.x,
            arp.y,
            arp.z,
            arp.height
                .map(|h| format!(" height {:.4}", h))
                .unwrap_or_default()
        );
    }
}
