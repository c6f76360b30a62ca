use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::Form;
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Fields submitted to create a paste, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPaste {
    pub content: Option<String>,
    pub title: Option<String>,
    pub syntax: Option<String>,
    pub expires: Option<String>,
    pub visibility: Option<String>,
}

impl NewPaste {
    pub fn with_content(content: impl Into<String>) -> Self {
        NewPaste {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "content" => &mut self.content,
            "title" => &mut self.title,
            "syntax" => &mut self.syntax,
            "expires" => &mut self.expires,
            "visibility" => &mut self.visibility,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Accepts either a urlencoded or a multipart form body.
#[async_trait]
impl<S> FromRequest<S> for NewPaste
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(paste) = Form::<NewPaste>::from_request(req, state).await?;
            return Ok(paste);
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut paste = NewPaste::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let value = field.text().await?;
            paste.set(&name, value);
        }
        Ok(paste)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedPaste {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Status {
    pub status: String,
}
