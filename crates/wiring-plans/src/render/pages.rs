//! Building output documents page by page

use super::xobject::{INHERITABLE_KEYS, copy_dictionary, copy_object_deep, inherited_attribute};
use crate::types::{PlanError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// A document pages are copied out of.
///
/// Holds the source-to-output object map, so a source is tied to the single
/// [`PageWriter`] it feeds. Shared resources (fonts, images) are copied once no
/// matter how many of its pages are appended.
pub struct PageSource<'a> {
    doc: &'a Document,
    page_ids: Vec<ObjectId>,
    cache: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageSource<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            page_ids: doc.get_pages().into_values().collect(),
            cache: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

/// An output document under construction with a flat page tree
pub struct PageWriter {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// The document being written, for adding shared objects such as XObjects
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append a new page built by the caller
    pub fn add_page(&mut self, mut page_dict: Dictionary) -> ObjectId {
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        let page_id = self.doc.add_object(page_dict);
        self.kids.push(Object::Reference(page_id));
        page_id
    }

    /// Copy page `index` (0-based) of `source` to the end of this document.
    ///
    /// Inherited attributes are written onto the copy so it stands alone in
    /// the flat output tree. Appending the same source page twice yields two
    /// distinct output pages.
    pub fn append_page(&mut self, source: &mut PageSource<'_>, index: usize) -> Result<ObjectId> {
        let doc = source.doc;
        let page_id = *source.page_ids.get(index).ok_or(PlanError::MissingPage {
            index,
            page_count: source.page_ids.len(),
        })?;
        let page_dict = doc.get_dictionary(page_id)?;

        let mut copied = copy_dictionary(&mut self.doc, doc, page_dict, &mut source.cache)?;

        for key in INHERITABLE_KEYS {
            if page_dict.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(doc, page_id, key) {
                let value = copy_object_deep(&mut self.doc, doc, value, &mut source.cache)?;
                copied.set(key.to_vec(), value);
            }
        }

        Ok(self.add_page(copied))
    }

    /// Copy every page of `source`, returning how many were appended
    pub fn append_all(&mut self, source: &mut PageSource<'_>) -> Result<usize> {
        let count = source.page_count();
        for index in 0..count {
            self.append_page(source, index)?;
        }
        Ok(count)
    }

    /// Write the page tree and catalog and hand back the document
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }
}
