use crate::attraction::Attraction;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::location::LocationContext;
use audioguide_llm::{ChatMessage, ChatProvider, ChatRequest};
use log::debug;
use std::fmt;
use std::sync::Arc;

const FACTS_MAX_TOKENS: u32 = 500;
const FACTS_TEMPERATURE: f32 = 0.7;

/// Generated block of short statements about one attraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSet(String);

impl FactSet {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First generation stage: asks the chat provider for facts.
#[derive(Clone)]
pub struct FactGenerator {
    provider: Arc<dyn ChatProvider>,
}

impl FactGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub fn build_request(
        &self,
        attraction: &Attraction,
        location: Option<&LocationContext>,
    ) -> ChatRequest {
        let system = format!(
            "You are a knowledgeable tour guide with expertise in history, architecture, and culture. \
             Provide accurate, engaging facts suitable for tourists. \
             Always respond in {}.",
            attraction.language()
        );

        let place = match location.and_then(LocationContext::describe) {
            Some(described) => format!("Location: {described}"),
            None => format!(
                "Coordinates: {:.6}, {:.6}",
                attraction.latitude(),
                attraction.longitude()
            ),
        };

        let user = format!(
            "Provide 3 to 5 interesting facts about \"{name}\" ({category}).\n\
             {place}\n\n\
             Favour surprising, specific details a visitor would not already know: \
             little-known stories, unusual architectural features, notable people or events tied to this exact place. \
             Avoid generic statements that would apply to any {category}.\n\n\
             Be concise. Each fact should be 1 to 2 sentences. Write in {language}.",
            name = attraction.name(),
            category = attraction.category(),
            language = attraction.language(),
        );

        ChatRequest::new(vec![
            ChatMessage::system().content(system).build(),
            ChatMessage::user().content(user).build(),
        ])
        .max_tokens(FACTS_MAX_TOKENS)
        .temperature(FACTS_TEMPERATURE)
    }

    pub async fn generate(
        &self,
        attraction: &Attraction,
        location: Option<&LocationContext>,
        deadline: &Deadline,
    ) -> Result<FactSet> {
        deadline.check()?;
        let request = self.build_request(attraction, location);
        debug!(
            "Requesting facts for '{}' from {} ({} messages)",
            attraction.name(),
            self.provider.provider_name(),
            request.messages.len()
        );
        let text = deadline.run(self.provider.chat(&request)).await??;
        Ok(FactSet::new(text))
    }
}
