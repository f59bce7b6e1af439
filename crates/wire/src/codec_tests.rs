// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn decodes_json_body() {
    let body = br#"{"name":"imagenet","count":3}"#;
    let sample: Sample = decode_body(body).unwrap();
    assert_eq!(
        sample,
        Sample {
            name: "imagenet".into(),
            count: 3
        }
    );
}

#[test]
fn decodes_yaml_body() {
    let body = b"name: imagenet\ncount: 3\n";
    let sample: Sample = decode_body(body).unwrap();
    assert_eq!(
        sample,
        Sample {
            name: "imagenet".into(),
            count: 3
        }
    );
}

#[test]
fn rejects_garbage_body() {
    let body = b"not: [valid: json: or: this";
    let result: Result<Sample, _> = decode_body(body);
    assert!(result.is_err());
}
