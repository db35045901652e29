//! Wire types for the OpenAI-compatible endpoints

use serde::{Deserialize, Serialize};

/// A model advertised by `GET /models`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
	pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
	#[serde(default)]
	pub data: Vec<ModelDescriptor>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
	model: &'a str,
	messages: Vec<ChatMessage<'a>>,
	max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
	role: &'static str,
	content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
	Text { text: &'a str },
	ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
	url: String,
}

impl<'a> ChatRequest<'a> {
	/// One user turn carrying the prompt and the image.
	pub fn caption(model: &'a str, prompt: &'a str, image_url: String, max_tokens: u32) -> Self {
		Self {
			model,
			messages: vec![ChatMessage {
				role: "user",
				content: vec![
					ContentPart::Text { text: prompt },
					ContentPart::ImageUrl { image_url: ImageUrl { url: image_url } },
				],
			}],
			max_tokens,
		}
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
	#[serde(default)]
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
	#[serde(default)]
	content: Option<String>,
}

impl ChatResponse {
	/// Trimmed content of the first choice, if any.
	pub fn into_caption(self) -> Option<String> {
		self.choices
			.into_iter()
			.next()
			.and_then(|c| c.message.content)
			.map(|text| text.trim().to_string())
	}
}
