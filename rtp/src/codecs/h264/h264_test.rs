use super::*;

#[test]
fn test_h264_payload() -> Result<()> {
    let empty = Bytes::from_static(&[]);
    let small_payload = Bytes::from_static(&[0x90, 0x90, 0x90]);
    let multiple_payload = Bytes::from_static(&[0x00, 0x00, 0x01, 0x90, 0x00, 0x00, 0x01, 0x90]);
    let large_payload = Bytes::from_static(&[
        0x00, 0x00, 0x01, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x10, 0x11,
        0x12, 0x13, 0x14, 0x15,
    ]);
    let large_payload_packetized = vec![
        Bytes::from_static(&[0x1c, 0x80, 0x01, 0x02, 0x03]),
        Bytes::from_static(&[0x1c, 0x00, 0x04, 0x05, 0x06]),
        Bytes::from_static(&[0x1c, 0x00, 0x07, 0x08, 0x09]),
        Bytes::from_static(&[0x1c, 0x00, 0x10, 0x11, 0x12]),
        Bytes::from_static(&[0x1c, 0x40, 0x13, 0x14, 0x15]),
    ];

    let mut pck = H264Payloader::default();

    // Positive MTU, empty payload
    let result = pck.payload(1, &empty)?;
    assert!(result.is_empty(), "Generated payload should be empty");

    // 0 MTU, small payload
    let result = pck.payload(0, &small_payload)?;
    assert!(result.is_empty(), "Generated payload should be empty");

    // MTU too small to fit even a FU-A header plus one byte
    let result = pck.payload(1, &small_payload)?;
    assert!(result.is_empty(), "Generated payload should be empty");

    // Positive MTU, small payload
    let result = pck.payload(5, &small_payload)?;
    assert_eq!(result, vec![small_payload.clone()]);

    // Multiple NALU in a single payload
    let result = pck.payload(5, &multiple_payload)?;
    assert_eq!(
        result,
        vec![Bytes::from_static(&[0x90]), Bytes::from_static(&[0x90])],
        "2 nal units should be broken out"
    );

    // Large Payload split across multiple RTP Packets
    let result = pck.payload(5, &large_payload)?;
    assert_eq!(result, large_payload_packetized, "FU-A packetization failed");

    // Nalu type 9 or 12
    let small_payload2 = Bytes::from_static(&[0x09, 0x00, 0x00]);
    let result = pck.payload(5, &small_payload2)?;
    assert!(result.is_empty(), "Generated payload should be empty");

    Ok(())
}

#[test]
fn test_h264_four_byte_start_code() -> Result<()> {
    let mut pck = H264Payloader::default();
    let payload = Bytes::from_static(&[
        0x00, 0x00, 0x00, 0x01, 0x65, 0xAA, 0x00, 0x00, 0x00, 0x01, 0x41, 0xBB,
    ]);

    let result = pck.payload(1200, &payload)?;
    assert_eq!(
        result,
        vec![
            Bytes::from_static(&[0x65, 0xAA]),
            Bytes::from_static(&[0x41, 0xBB])
        ]
    );

    Ok(())
}

#[test]
fn test_h264_fua_keeps_nri() -> Result<()> {
    let mut pck = H264Payloader::default();
    // IDR slice with NRI 3
    let payload = Bytes::from_static(&[0x65, 0x01, 0x02, 0x03, 0x04]);

    let result = pck.payload(4, &payload)?;
    assert_eq!(
        result,
        vec![
            Bytes::from_static(&[0x7c, 0x85, 0x01, 0x02]),
            Bytes::from_static(&[0x7c, 0x45, 0x03, 0x04]),
        ]
    );

    Ok(())
}

#[test]
fn test_h264_payloader_payload_sps_and_pps_handling() -> Result<()> {
    let mut pck = H264Payloader::default();
    let expected = vec![
        Bytes::from_static(&[
            0x78, 0x00, 0x03, 0x07, 0x00, 0x01, 0x00, 0x03, 0x08, 0x02, 0x03,
        ]),
        Bytes::from_static(&[0x05, 0x04, 0x05]),
    ];

    // When packetizing SPS and PPS are emitted with following NALU
    let res = pck.payload(1500, &Bytes::from_static(&[0x07, 0x00, 0x01]))?;
    assert!(res.is_empty(), "Generated payload should be empty");

    let res = pck.payload(1500, &Bytes::from_static(&[0x08, 0x02, 0x03]))?;
    assert!(res.is_empty(), "Generated payload should be empty");

    let actual = pck.payload(1500, &Bytes::from_static(&[0x05, 0x04, 0x05]))?;
    assert_eq!(actual, expected, "SPS and PPS aren't packed together");

    // the aggregate is sent once
    let actual = pck.payload(1500, &Bytes::from_static(&[0x05, 0x04, 0x05]))?;
    assert_eq!(actual, vec![Bytes::from_static(&[0x05, 0x04, 0x05])]);

    Ok(())
}

#[test]
fn test_h264_parameter_sets_in_one_access_unit() -> Result<()> {
    let mut pck = H264Payloader::default();
    let payload = Bytes::from_static(&[
        0x00, 0x00, 0x00, 0x01, 0x67, 0x42, 0x00, 0x00, 0x00, 0x01, 0x68, 0xCE, 0x00, 0x00, 0x01,
        0x65, 0x88,
    ]);

    let result = pck.payload(1200, &payload)?;
    assert_eq!(
        result,
        vec![
            Bytes::from_static(&[0x78, 0x00, 0x02, 0x67, 0x42, 0x00, 0x02, 0x68, 0xCE]),
            Bytes::from_static(&[0x65, 0x88]),
        ]
    );

    Ok(())
}
