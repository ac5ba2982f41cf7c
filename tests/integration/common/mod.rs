//! Shared fixtures for integration tests
#![allow(dead_code)]

use decree_scout::config::{Config, DocumentEntry};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const BULLETIN_FILE: &str = "art_11_anul_2023.pdf";
pub const BULLETIN_PATH: &str = "/storage/art_11_anul_2023.pdf";
pub const TEST_USER_AGENT: &str = "decree-scout-test";

/// Builds a PDF with one line of text per page
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![40.into(), 760.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A bulletin listing one resolved and one pending case
pub fn sample_bulletin() -> Vec<u8> {
    build_pdf(&[
        "Ordinul presedintelui ANC - anexa",
        "123/RD/2023    12.05.2023    45/P/2024",
        "456/RD/2023    03.07.2023",
        "789/RD/2022    01.02.2022    12/P/2023",
    ])
}

/// Configuration pointing a single 2023 bulletin at the mock server
pub fn test_config(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.source.base_url = format!("{}/storage/", server_uri);
    config.source.user_agent = TEST_USER_AGENT.to_string();
    config.source.request_timeout_secs = 5;
    config.source.connect_timeout_secs = 2;
    config.source.documents = vec![DocumentEntry {
        year: 2023,
        file: BULLETIN_FILE.to_string(),
    }];
    config.retry.backoff_base_ms = 20;
    config.scanner.max_workers = 4;
    config.scanner.batch_size = 1;
    config
}
