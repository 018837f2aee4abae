//! Decode File - run an MP3 or ADTS file through the frame driver.
//!
//! No real codec is linked here; the decoder only checks that each frame is
//! long enough to carry a header and reports silence of the nominal frame
//! length. Useful for seeing how a file synchronizes.
//!
//! ```sh
//! RUST_LOG=syncframe=debug cargo run --example decode_file -- song.mp3
//! RUST_LOG=info cargo run --example decode_file -- stream.aac aac
//! ```

use std::fs::File;
use std::io::BufReader;

use syncframe::decoder::{AudioInfo, DecodedFrame, FnDecoder};
use syncframe::source::StreamCopy;
use syncframe::{DecodeError, FrameDriver, SyncConfig, SyncEvent};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: decode_file <file> [mp3|aac]")?;
    let (config, samples_per_frame) = match args.next().as_deref() {
        Some("aac") => (SyncConfig::aac(), 1024 * 2),
        _ => (SyncConfig::mp3(), 1152 * 2),
    };

    let decoder = FnDecoder::new(move |frame: &[u8]| {
        if frame.len() < 8 {
            return Err(DecodeError::Recoverable(format!(
                "{} byte frame is too short",
                frame.len()
            )));
        }
        Ok(DecodedFrame::new(vec![0; samples_per_frame]).with_info(AudioInfo::pcm16(44_100, 2)))
    });

    let mut driver = FrameDriver::new(config, decoder);
    driver.on_event(|event| match event {
        SyncEvent::FrameDecoded { .. } => {}
        other => eprintln!("{:?}", other),
    });
    driver.start()?;

    let mut copier = StreamCopy::new(BufReader::new(File::open(&path)?));
    let bytes = copier.copy_all(&mut driver)?;
    driver.stop();

    println!(
        "{}: {} bytes, {} frames",
        path,
        bytes,
        driver.frames_processed()
    );
    Ok(())
}
