use super::*;

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_generic_fmtp_parse() {
    let tests = vec![
        ("OneParam", "key-name=value", params(&[("key-name", "value")])),
        (
            "OneParamWithWhiteSpaces",
            "\tkey-name=value ",
            params(&[("key-name", "value")]),
        ),
        (
            "TwoParams",
            "key-name=value;key2=value2",
            params(&[("key-name", "value"), ("key2", "value2")]),
        ),
        (
            "TwoParamsWithWhiteSpaces",
            "key-name=value;  \n\tkey2=value2 ",
            params(&[("key-name", "value"), ("key2", "value2")]),
        ),
        (
            "UppercaseKeyKeepsValue",
            "Minptime=10;useinbandfec=ABC",
            params(&[("minptime", "10"), ("useinbandfec", "ABC")]),
        ),
    ];

    for (name, input, expected) in tests {
        let f = parse("audio/opus", input);
        let expected: Box<dyn Fmtp> = Box::new(GenericFmtp {
            mime_type: "audio/opus".to_owned(),
            parameters: expected,
        });
        assert_eq!(&f, &expected, "{name} failed");
        assert_eq!(f.mime_type(), "audio/opus");
    }
}

#[test]
fn test_generic_fmtp_compare() {
    let tests = vec![
        (
            "Equal",
            "key1=value1;key2=value2;key3=value3",
            "key1=value1;key2=value2;key3=value3",
            true,
        ),
        (
            "EqualWithWhitespaceVariants",
            "key1=value1;key2=value2;key3=value3",
            "  key1=value1;  \nkey2=value2;\t\nkey3=value3",
            true,
        ),
        (
            "EqualWithCase",
            "key1=value1;key2=value2;key3=value3",
            "key1=value1;key2=Value2;Key3=value3",
            true,
        ),
        (
            "OneHasExtraParam",
            "key1=value1;key2=value2;key3=value3",
            "key1=value1;key2=value2;key3=value3;key4=value4",
            true,
        ),
        (
            "Inconsistent",
            "key1=value1;key2=value2;key3=value3",
            "key1=value1;key2=different_value;key3=value3",
            false,
        ),
        (
            "Inconsistent_OneHasExtraParam",
            "key1=value1;key2=value2;key3=value3;key4=value4",
            "key1=value1;key2=different_value;key3=value3",
            false,
        ),
    ];

    for (name, a, b, consist) in tests {
        let check = |a, b| {
            let aa = parse("audio/opus", a);
            let bb = parse("audio/opus", b);
            assert_eq!(aa.match_fmtp(&*bb), consist, "{name}: '{a}' vs '{b}'");
        };

        check(a, b);
        check(b, a);
    }
}

#[test]
fn test_generic_fmtp_mime_type_mismatch() {
    let a = parse("audio/opus", "minptime=10");
    let b = parse("audio/PCMU", "minptime=10");
    assert!(!a.match_fmtp(&*b));

    let c = parse("AUDIO/OPUS", "minptime=10");
    assert!(a.match_fmtp(&*c));
}

#[test]
fn test_generic_fmtp_parameter() {
    let f = parse("audio/opus", "minptime=10;useinbandfec=1");
    assert_eq!(f.parameter("minptime"), Some(&"10".to_owned()));
    assert_eq!(f.parameter("stereo"), None);
}
