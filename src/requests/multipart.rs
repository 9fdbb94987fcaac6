// src/requests/multipart.rs
use crate::errors::ServerError;
use crate::requests::form::FormFields;
use multipart::server::Multipart;
use std::io::{Cursor, Read};

/// A file input from a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: FormFields,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn files_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FilePart> + 'a {
        self.files.iter().filter(move |f| f.field == field)
    }
}

/// Boundary from a `multipart/form-data; boundary=...` content type.
pub fn boundary(content_type: &str) -> Option<String> {
    let m: mime::Mime = content_type.parse().ok()?;
    if m.type_() != mime::MULTIPART || m.subtype() != mime::FORM_DATA {
        return None;
    }
    m.get_param(mime::BOUNDARY).map(|b| b.as_str().to_string())
}

pub fn parse_multipart(content_type: &str, body: Vec<u8>) -> Result<MultipartForm, ServerError> {
    let boundary = boundary(content_type)
        .ok_or_else(|| ServerError::BadRequest("expected multipart/form-data".into()))?;

    let mut mp = Multipart::with_body(Cursor::new(body), boundary);
    let mut form = MultipartForm::default();

    while let Some(mut field) = mp
        .read_entry()
        .map_err(|e| ServerError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.headers.name.to_string();
        let mut data = Vec::new();
        field
            .data
            .read_to_end(&mut data)
            .map_err(|e| ServerError::BadRequest(format!("failed to read field {name}: {e}")))?;

        match field.headers.filename.clone() {
            // Browsers send an empty part for a file input left blank.
            Some(file_name) if file_name.is_empty() && data.is_empty() => {}
            Some(file_name) => form.files.push(FilePart {
                field: name,
                file_name,
                content_type: field
                    .headers
                    .content_type
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string()),
                bytes: data,
            }),
            None => {
                let value = String::from_utf8(data).map_err(|_| {
                    ServerError::BadRequest(format!("field {name} is not valid UTF-8"))
                })?;
                form.fields.push(name, value);
            }
        }
    }

    Ok(form)
}
