use bytes::BytesMut;

use super::*;
use crate::error::Result;

#[test]
fn test_basic() -> Result<()> {
    let raw_pkt = Bytes::from_static(&[
        0x90, 0xe0, 0x69, 0x8f, 0xd9, 0xc2, 0x93, 0xda, 0x1c, 0x64, 0x27, 0x82, 0x00, 0x01, 0x00,
        0x01, 0xff, 0xff, 0xff, 0xff, 0x98, 0x36, 0xbe, 0x88, 0x9e,
    ]);
    let parsed_packet = Packet {
        header: Header {
            version: 2,
            padding: false,
            extension: true,
            marker: true,
            payload_type: 96,
            sequence_number: 27023,
            timestamp: 3653407706,
            ssrc: 476325762,
            csrc: vec![],
            extension_profile: 1,
            extensions: vec![Extension {
                id: 0,
                payload: Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF]),
            }],
        },
        payload: Bytes::from_static(&[0x98, 0x36, 0xbe, 0x88, 0x9e]),
        padding_size: 0,
    };

    let buf = &mut raw_pkt.clone();
    let packet = Packet::unmarshal(buf)?;
    assert_eq!(packet, parsed_packet);
    assert_eq!(packet.header.marshal_size(), 20, "wrong computed header size");
    assert_eq!(packet.marshal_size(), raw_pkt.len());

    let raw = packet.marshal()?;
    assert_eq!(raw, raw_pkt);

    Ok(())
}

#[test]
fn test_padding_is_stripped() -> Result<()> {
    let raw_pkt = Bytes::from_static(&[
        0xa0, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x11, 0x22, 0x00,
        0x00, 0x03,
    ]);
    let buf = &mut raw_pkt.clone();
    let packet = Packet::unmarshal(buf)?;
    assert!(packet.header.padding);
    assert_eq!(packet.padding_size, 3);
    assert_eq!(packet.payload, Bytes::from_static(&[0x11, 0x22]));

    let mut out = BytesMut::with_capacity(packet.marshal_size());
    out.resize(packet.marshal_size(), 0);
    packet.marshal_to(&mut out)?;
    assert_eq!(out.freeze(), raw_pkt);

    Ok(())
}

#[test]
fn test_padding_larger_than_payload() {
    let raw_pkt = Bytes::from_static(&[
        0xa0, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x11, 0x09,
    ]);
    let buf = &mut raw_pkt.clone();
    let result = Packet::unmarshal(buf);
    assert!(result.is_err(), "padding beyond the payload must be rejected");
}

#[test]
fn test_marshal_buffer_too_small() {
    let packet = Packet {
        header: Header {
            version: 2,
            ..Default::default()
        },
        payload: Bytes::from_static(&[1, 2, 3]),
        ..Default::default()
    };
    let mut buf = [0u8; 10];
    let result = packet.marshal_to(&mut buf);
    assert!(result.is_err());
}

#[test]
fn test_display() {
    let packet = Packet {
        header: Header {
            version: 2,
            marker: true,
            payload_type: 111,
            sequence_number: 7,
            timestamp: 960,
            ssrc: 0xABCD,
            ..Default::default()
        },
        payload: Bytes::from_static(&[0; 4]),
        ..Default::default()
    };
    let s = packet.to_string();
    assert!(s.starts_with("RTP PACKET:\n"));
    assert!(s.contains("\tSSRC: 43981 (abcd)\n"));
    assert!(s.contains("\tPayload Length: 4\n"));
}
