use super::*;

fn capability(mime_type: &str, sdp_fmtp_line: &str) -> RTCRtpCodecCapability {
    RTCRtpCodecCapability {
        mime_type: mime_type.to_owned(),
        clock_rate: 90000,
        sdp_fmtp_line: sdp_fmtp_line.to_owned(),
        ..Default::default()
    }
}

fn codec(mime_type: &str, sdp_fmtp_line: &str, payload_type: PayloadType) -> RTCRtpCodecParameters {
    RTCRtpCodecParameters {
        capability: capability(mime_type, sdp_fmtp_line),
        payload_type,
        ..Default::default()
    }
}

#[test]
fn test_payloader_for_codec() -> Result<()> {
    let tests = vec![
        (MIME_TYPE_H264, "H264Payloader"),
        ("VIDEO/h264", "H264Payloader"),
        (MIME_TYPE_VP8, "Vp8Payloader"),
        ("video/vp9", "Vp9Payloader"),
        (MIME_TYPE_OPUS, "OpusPayloader"),
        ("audio/OPUS", "OpusPayloader"),
        (MIME_TYPE_G722, "G7xxPayloader"),
        (MIME_TYPE_PCMU, "G7xxPayloader"),
        (MIME_TYPE_PCMA, "G7xxPayloader"),
        (MIME_TYPE_TELEPHONE_EVENT, "G7xxPayloader"),
    ];

    for (mime_type, expected) in tests {
        let payloader = capability(mime_type, "").payloader_for_codec()?;
        let name = format!("{payloader:?}");
        assert!(
            name.starts_with(expected),
            "{mime_type}: expected {expected}, got {name}"
        );
    }

    Ok(())
}

#[test]
fn test_payloader_for_codec_vp8_carries_picture_id() -> Result<()> {
    let mut payloader = capability(MIME_TYPE_VP8, "").payloader_for_codec()?;
    let payloads = payloader.payload(100, &bytes::Bytes::from_static(&[0x90, 0x90]))?;
    assert_eq!(payloads.len(), 1);
    // X bit set in the required descriptor byte
    assert_eq!(payloads[0][0] & 0x80, 0x80);
    Ok(())
}

#[test]
fn test_payloader_for_codec_unknown() {
    let result = capability("video/AV1", "").payloader_for_codec();
    assert_eq!(result.unwrap_err(), Error::ErrNoPayloaderForCodec);
}

#[test]
fn test_rtp_codec_type() {
    assert_eq!(RTPCodecType::from_mime_type("video/VP8"), RTPCodecType::Video);
    assert_eq!(RTPCodecType::from_mime_type("AUDIO/opus"), RTPCodecType::Audio);
    assert_eq!(
        RTPCodecType::from_mime_type("application/data"),
        RTPCodecType::Unspecified
    );
    assert_eq!(RTPCodecType::from_mime_type("opus"), RTPCodecType::Unspecified);

    assert_eq!(RTPCodecType::Audio.to_string(), "audio");
    assert_eq!(RTPCodecType::Video.to_string(), "video");
    assert_eq!(RTPCodecType::Unspecified.to_string(), "Unspecified");
}

#[test]
fn test_codec_parameters_fuzzy_search() {
    let haystack = vec![
        codec(
            MIME_TYPE_H264,
            "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42001f",
            102,
        ),
        codec(
            MIME_TYPE_H264,
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
            125,
        ),
        codec(MIME_TYPE_OPUS, "minptime=10;useinbandfec=1", 111),
    ];

    let tests = vec![
        (
            "ExactOnPacketizationMode",
            codec(
                MIME_TYPE_H264,
                "packetization-mode=1;profile-level-id=42e01f",
                0,
            ),
            125,
            CodecMatch::Exact,
        ),
        (
            "PartialWithoutFmtp",
            codec("video/h264", "", 0),
            102,
            CodecMatch::Partial,
        ),
        (
            "PartialOnIncompatibleProfile",
            codec(
                MIME_TYPE_H264,
                "packetization-mode=1;profile-level-id=640032",
                0,
            ),
            102,
            CodecMatch::Partial,
        ),
        (
            "ExactGeneric",
            codec(MIME_TYPE_OPUS, "useinbandfec=1", 0),
            111,
            CodecMatch::Exact,
        ),
    ];

    for (name, needle, payload_type, expected) in tests {
        let (c, m) = codec_parameters_fuzzy_search(&needle, &haystack);
        assert_eq!(m, expected, "{name}");
        assert_eq!(c.payload_type, payload_type, "{name}");
    }

    let (c, m) = codec_parameters_fuzzy_search(&codec(MIME_TYPE_VP8, "", 0), &haystack);
    assert_eq!(m, CodecMatch::None);
    assert_eq!(c, RTCRtpCodecParameters::default());
}
