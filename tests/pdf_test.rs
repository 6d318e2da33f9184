//! Integration tests over real PDF bytes built with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use curriculum_pdf::{
    convert_file, parse_bytes, BlockSource, DisciplineRef, JsonFormat, Layout, ParseOptions,
    PdfSource, Vocabulary,
};

const HEADING_MARGIN: f32 = 59.809;
const BODY_MARGIN: f32 = 72.0;

/// One line of text at an absolute position, 9pt.
fn text_line(x: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 9.into()]),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Single-page curriculum: a period marker, one heading block of six lines
/// (10pt apart) and body blocks separated by wider gaps.
fn curriculum_pdf() -> Vec<u8> {
    let mut lines = vec![(BODY_MARGIN, 760.0, "1 PERIODO")];
    let heading = ["IF101- ALGORITMOS", "OBRIGATORIA", "30", "30", "64", "4.0"];
    for (i, text) in heading.iter().enumerate() {
        lines.push((HEADING_MARGIN, 700.0 - 10.0 * i as f32, *text));
    }
    lines.extend([
        (BODY_MARGIN, 600.0, "PRE-REQUISITO:"),
        (BODY_MARGIN, 550.0, "IF100- INTRODUCAO"),
        (BODY_MARGIN, 500.0, "EMENTA: ALGORITMOS BASICOS."),
        (BODY_MARGIN, 450.0, "CURSO: CIENCIA DA COMPUTACAO"),
    ]);

    let operations: Vec<Operation> = lines
        .into_iter()
        .flat_map(|(x, y, text)| text_line(x, y, text))
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
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

/// The fixture is plain ASCII, so the accented markers are swapped out.
fn ascii_options() -> ParseOptions {
    let vocabulary =
        Vocabulary::from_json(r#"{"prerequisite": "PRE-REQUISITO:", "period": "PERIODO"}"#)
            .unwrap();
    ParseOptions::new()
        .with_layout(Layout::ComputerScience)
        .with_vocabulary(vocabulary)
}

#[test]
fn test_pdf_source_blocks() {
    let source = PdfSource::from_bytes(&curriculum_pdf(), "grade.pdf").unwrap();
    assert_eq!(source.page_count(), 1);

    let blocks = source.page_blocks(0).unwrap();
    let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "1 PERIODO",
            "IF101- ALGORITMOS\nOBRIGATORIA\n30\n30\n64\n4.0",
            "PRE-REQUISITO:",
            "IF100- INTRODUCAO",
            "EMENTA: ALGORITMOS BASICOS.",
            "CURSO: CIENCIA DA COMPUTACAO",
        ]
    );
    assert!((blocks[1].x - HEADING_MARGIN).abs() < 0.01);
    assert!((blocks[2].x - BODY_MARGIN).abs() < 0.01);
}

#[test]
fn test_parse_bytes_end_to_end() {
    let curriculum = parse_bytes(&curriculum_pdf(), "grade.pdf", ascii_options()).unwrap();

    assert_eq!(curriculum.summary.course, "CIENCIA DA COMPUTACAO");
    assert_eq!(curriculum.summary.semesters, 1);
    assert_eq!(curriculum.disciplines.len(), 1);

    let discipline = &curriculum.disciplines[0];
    assert_eq!(discipline.code, "IF101");
    assert_eq!(discipline.name, "ALGORITMOS");
    assert_eq!(discipline.hours, 64);
    assert_eq!(discipline.credits, 4);
    assert_eq!(discipline.semester, 1);
    assert!(discipline.is_obligatory);
    assert_eq!(discipline.ementa, "ALGORITMOS BASICOS.");
    assert_eq!(
        discipline.prerequisites,
        vec![DisciplineRef::new("IF100", "INTRODUCAO")]
    );
    // IF100 is not part of the document
    assert!(discipline.dependents.is_empty());
}

#[test]
fn test_convert_file_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("grade.pdf");
    let output = dir.path().join("grade.json");
    std::fs::write(&input, curriculum_pdf()).unwrap();

    let curriculum = convert_file(&input, &output, ascii_options(), JsonFormat::Compact).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["course"], "CIENCIA DA COMPUTACAO");
    assert_eq!(value["semesters"], 1);
    assert_eq!(value["totalHours"], 0);
    assert_eq!(value["disciplines"][0]["code"], "IF101");
    assert_eq!(value["disciplines"][0]["isObligatory"], true);
    assert_eq!(value["disciplines"][0]["prerequisites"][0]["code"], "IF100");
    assert_eq!(
        value["disciplines"].as_array().map(Vec::len),
        Some(curriculum.disciplines.len())
    );
}

#[test]
fn test_default_vocabulary_misses_ascii_markers() {
    // Without the ASCII overrides the period and prerequisite markers are
    // not recognized, so the discipline has no semester and no prerequisites
    let curriculum = parse_bytes(&curriculum_pdf(), "grade.pdf", ParseOptions::default()).unwrap();
    let discipline = &curriculum.disciplines[0];
    assert_eq!(discipline.semester, 0);
    assert!(discipline.prerequisites.is_empty());
    assert_eq!(curriculum.summary.semesters, 0);
}
