#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Build a document with one 612x792 page per label. Each page's content
/// stream starts with a `% label` comment so tests can identify it later.
pub fn create_marked_pdf(labels: &[&str]) -> Document {
    create_marked_pdf_with(labels, |_| {})
}

/// Like [`create_marked_pdf`], letting the caller adjust each page dictionary
pub fn create_marked_pdf_with(labels: &[&str], mut adjust: impl FnMut(&mut Dictionary)) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for label in labels {
        let content = format!("% {}\nq Q\n", label);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        adjust(&mut page);
        let page_id = doc.add_object(page);
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(labels.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Labels of every page in order. Cropped pages are identified through the
/// Form XObject they draw.
pub fn page_labels(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| page_label(doc, page_id).unwrap_or_else(|| "?".to_string()))
        .collect()
}

pub fn page_label(doc: &Document, page_id: ObjectId) -> Option<String> {
    let content = doc.get_page_content(page_id).ok()?;
    if let Some(label) = find_label(&content) {
        return Some(label);
    }

    let resources = doc
        .get_dictionary(page_id)
        .ok()?
        .get(b"Resources")
        .ok()?
        .as_dict()
        .ok()?;
    let xobjects = resources.get(b"XObject").ok()?.as_dict().ok()?;
    xobjects.iter().find_map(|(_, value)| {
        let id = value.as_reference().ok()?;
        let stream = doc.get_object(id).ok()?.as_stream().ok()?;
        let content = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        find_label(&content)
    })
}

fn find_label(content: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(content);
    text.lines()
        .find_map(|line| line.strip_prefix("% "))
        .map(|label| label.trim().to_string())
}

/// `[a, b, c, d]` of a numeric array entry on a page or XObject dictionary
pub fn number_array(dict: &Dictionary, key: &[u8]) -> Vec<f32> {
    dict.get(key)
        .and_then(Object::as_array)
        .map(|arr| {
            arr.iter()
                .map(|v| match v {
                    Object::Integer(i) => *i as f32,
                    Object::Real(r) => *r,
                    _ => f32::NAN,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub const CROPS_CSV: &str = "\
Room1,1,0,0,100,200
Room2,2,50,50,250,150
";
