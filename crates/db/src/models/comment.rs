//! Product comment model and DTOs.

use misarfeh_core::types::{DbId, Timestamp};
use misarfeh_core::validator::{check_contact_phone, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_max_len, patch};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<DbId>,
    pub text: String,
    pub phone: String,
    pub username: String,
    pub rate: i16,
}

/// A comment row together with the window count of its list query.
#[derive(Debug, FromRow)]
pub struct CommentListRow {
    pub total_records: i64,
    #[sqlx(flatten)]
    pub comment: Comment,
}

/// Writable comment fields: the body of `POST /v1/product/comments`, and
/// the merged state of an existing comment after a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentInput {
    pub product_id: Option<DbId>,
    pub text: String,
    pub phone: String,
    pub username: String,
    pub rate: i16,
}

impl CommentInput {
    pub fn validate(&self, v: &mut Validator) {
        v.check(!self.text.is_empty(), "text", "must be provided");
        check_max_len(v, "text", &self.text, 1000);

        check_contact_phone(v, "phone", &self.phone);

        v.check(!self.username.is_empty(), "username", "must be provided");
        check_max_len(v, "username", &self.username, 100);

        v.check(self.rate != 0, "rate", "must be provided");
        v.check(self.rate >= 1, "rate", "must be greater than 0");
        v.check(self.rate <= 5, "rate", "must not be more than 5");

        if let Some(product_id) = self.product_id {
            v.check(product_id > 0, "product_id", "must be a positive integer");
        }
    }
}

impl From<&Comment> for CommentInput {
    fn from(comment: &Comment) -> Self {
        Self {
            product_id: comment.product_id,
            text: comment.text.clone(),
            phone: comment.phone.clone(),
            username: comment.username.clone(),
            rate: comment.rate,
        }
    }
}

/// Body of `PUT /v1/product/comments/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateComment {
    pub text: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub rate: Option<i16>,
}

impl UpdateComment {
    pub fn apply_to(&self, input: &mut CommentInput) {
        patch(&mut input.text, &self.text);
        patch(&mut input.phone, &self.phone);
        patch(&mut input.username, &self.username);
        patch(&mut input.rate, &self.rate);
    }
}
