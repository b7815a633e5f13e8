use crate::deadline::Deadline;
use crate::error::Result;
use crate::facts::FactSet;
use audioguide_llm::{ChatMessage, ChatProvider, ChatRequest};
use log::debug;
use std::fmt;
use std::sync::Arc;

const SCRIPT_MAX_TOKENS: u32 = 300;
const SCRIPT_TEMPERATURE: f32 = 0.8;

const SCRIPTWRITER_SYSTEM_PROMPT: &str = "You are a professional audio guide scriptwriter. \
Write natural, conversational scripts that will be read aloud by a text-to-speech engine. \
Follow these rules strictly:\n\
- Spell out all numbers, dates and ordinals as words (\"eighteen eighty-nine\", not \"1889\"; \"third\", not \"3rd\").\n\
- Expand every abbreviation (\"Saint\", not \"St.\"; \"meters\", not \"m\").\n\
- Spell out acronyms letter by letter or explain them in words.\n\
- Do not use special characters, symbols, emoji, markdown or bullet points.\n\
- Never make visual references such as \"as you can see\" or \"look to your left\".";

/// Speech-ready narration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationScript(String);

impl NarrationScript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NarrationScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct ScriptComposer {
    provider: Arc<dyn ChatProvider>,
}

impl ScriptComposer {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub fn build_request(&self, name: &str, facts: &FactSet, language: &str) -> ChatRequest {
        let system = format!("{SCRIPTWRITER_SYSTEM_PROMPT}\nWrite the entire script in {language}.");
        let user = format!(
            "Write a 30 to 60 second audio guide script for \"{name}\" based on these facts:\n\n\
             {facts}\n\n\
             Requirements:\n\
             - Start with a warm welcome mentioning {name}\n\
             - Share 2 to 3 of the most interesting facts conversationally\n\
             - End with an invitation to explore\n\
             - Keep it between 80 and 150 words\n\
             - Write the entire script in {language}"
        );

        ChatRequest::new(vec![
            ChatMessage::system().content(system).build(),
            ChatMessage::user().content(user).build(),
        ])
        .max_tokens(SCRIPT_MAX_TOKENS)
        .temperature(SCRIPT_TEMPERATURE)
    }

    pub async fn compose(
        &self,
        name: &str,
        facts: &FactSet,
        language: &str,
        deadline: &Deadline,
    ) -> Result<NarrationScript> {
        deadline.check()?;
        let request = self.build_request(name, facts, language);
        debug!(
            "Composing {language} script for '{name}' from {} chars of facts",
            facts.as_str().len()
        );
        let text = deadline.run(self.provider.chat(&request)).await??;
        Ok(NarrationScript::new(text))
    }
}
