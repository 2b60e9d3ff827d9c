use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{AppSettings, Arg, Command};
use local_sample_track::provider::{new_file_sample_provider, H264ProfileRotation};
use local_sample_track::rtp_transceiver::rtp_codec::{
    RTCRtpCodecParameters, RTCRtpParameters, MIME_TYPE_H264, MIME_TYPE_VP8,
};
use local_sample_track::track::track_local::local_sample_track::{
    LocalSampleTrack, OnWriteCompleteHdlrFn,
};
use local_sample_track::track::track_local::{TrackLocal, TrackLocalContext, TrackLocalWriter};
use local_sample_track::transport::UdpTrackWriter;
use local_sample_track::Error;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> Result<()> {
    let mut app = Command::new("play-from-disk")
        .version("0.1.0")
        .about("Streams an H.264 Annex-B or IVF/VP8 file as paced RTP over UDP.")
        .setting(AppSettings::DeriveDisplayOrder)
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("FULLHELP")
                .help("Prints more detailed help information")
                .long("fullhelp"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Prints debug log information"),
        )
        .arg(
            Arg::new("video")
                .required_unless_present("FULLHELP")
                .takes_value(true)
                .short('v')
                .long("video")
                .help("Video file to be streamed, .h264 or .ivf"),
        )
        .arg(
            Arg::new("remote")
                .takes_value(true)
                .short('r')
                .long("remote")
                .default_value("127.0.0.1:5004")
                .help("Address the RTP packets are sent to"),
        )
        .arg(
            Arg::new("payload-type")
                .takes_value(true)
                .long("payload-type")
                .default_value("96")
                .help("RTP payload type to send with"),
        );

    let matches = app.clone().get_matches();

    if matches.is_present("FULLHELP") {
        app.print_long_help()?;
        std::process::exit(0);
    }

    if matches.is_present("debug") {
        env_logger::Builder::new()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{}:{} [{}] {} - {}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.level(),
                    chrono::Local::now().format("%H:%M:%S.%6f"),
                    record.args()
                )
            })
            .filter(None, log::LevelFilter::Trace)
            .init();
    }

    let video_file = matches.value_of("video").unwrap_or_default();
    let remote = matches.value_of("remote").unwrap_or("127.0.0.1:5004");
    let payload_type: u8 = matches.value_of_t("payload-type")?;

    let path = Path::new(video_file);
    if !path.exists() {
        return Err(Error::new(format!("video file: '{video_file}' not exist")).into());
    }
    let mime_type = match path.extension().and_then(|e| e.to_str()) {
        Some("ivf") => MIME_TYPE_VP8,
        _ => MIME_TYPE_H264,
    };

    let mut rotation = H264ProfileRotation::new();
    let file = File::open(path)?;
    let (provider, codec) = new_file_sample_provider(BufReader::new(file), mime_type, &mut rotation)?;
    println!("streaming {video_file} as {} to {remote}", codec.mime_type);

    let track = Arc::new(LocalSampleTrack::new(codec.clone()));

    let done = Arc::new(Notify::new());
    let done_tx = Arc::clone(&done);
    let on_complete: OnWriteCompleteHdlrFn = Box::new(move || {
        let done_tx = Arc::clone(&done_tx);
        Box::pin(async move {
            done_tx.notify_one();
        })
    });
    track.start_write(provider, Some(on_complete)).await?;

    let writer: Arc<dyn TrackLocalWriter + Send + Sync> =
        Arc::new(UdpTrackWriter::connect("0.0.0.0:0", remote).await?);
    let ctx = TrackLocalContext::new(
        track.id().to_owned(),
        RTCRtpParameters {
            header_extensions: vec![],
            codecs: vec![RTCRtpCodecParameters {
                capability: codec,
                payload_type,
                ..Default::default()
            }],
        },
        rand::random::<u32>(),
        Some(writer),
    );

    let negotiated = track.bind(&ctx).await?;
    println!(
        "bound {} with payload type {}",
        track.id(),
        negotiated.payload_type
    );

    println!("Press ctrl-c to stop");
    tokio::select! {
        _ = done.notified() => {
            println!("reached end of file");
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
        }
    };

    track.unbind(&ctx).await?;

    Ok(())
}
