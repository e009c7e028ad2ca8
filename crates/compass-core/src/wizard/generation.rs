use super::{NoticeLevel, Wizard};
use crate::{
    ai::{map_response, prompt_for_step, CompletionRequest, CompletionResponse},
    error::Result,
    models::step_info,
};

/// Result of applying one AI response to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub step: u8,
    /// Fields replaced by generated content
    pub applied: Vec<&'static str>,
    /// Fields the response did not fill; they keep their previous value
    pub skipped: Vec<&'static str>,
}

impl Wizard {
    /// Whether AI generation can be offered in this session.
    pub fn ai_available(&self) -> bool {
        self.context.ai.is_some() && !self.mode.is_read_only()
    }

    /// Step whose generation is in flight, if any.
    pub fn generating_step(&self) -> Option<u8> {
        self.generating
    }

    /// Starts a generation for `step` and returns the request to send.
    ///
    /// Returns `None`, with a notice queued, when AI is unavailable, another
    /// generation is running or the step offers no suggestions. Only one
    /// generation may be in flight per session.
    pub fn begin_generation(&mut self, step: u8) -> Result<Option<CompletionRequest>> {
        let info = step_info(step)?;

        if !self.ai_available() {
            self.notify(NoticeLevel::Warning, "AI assistance is not available");
            return Ok(None);
        }
        if let Some(running) = self.generating {
            self.notify(
                NoticeLevel::Warning,
                format!("AI generation for step {running} is still running"),
            );
            return Ok(None);
        }
        let Some(request) = prompt_for_step(step, &self.data, self.context.language)? else {
            self.notify(
                NoticeLevel::Info,
                format!("No AI suggestions are offered for {}", info.title),
            );
            return Ok(None);
        };

        self.generating = Some(step);
        log::info!("Starting AI generation for step {step} ({})", info.key);
        Ok(Some(request))
    }

    /// Applies the service's answer for a generation started with
    /// [`Wizard::begin_generation`].
    ///
    /// Failures leave the data untouched and queue an error notice. Answers
    /// for a step that is not in flight are ignored.
    pub fn finish_generation(
        &mut self,
        step: u8,
        response: Result<CompletionResponse>,
    ) -> Option<GenerationOutcome> {
        if self.generating != Some(step) {
            log::warn!("Ignoring AI response for step {step}; no generation in flight");
            return None;
        }
        self.generating = None;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("AI generation failed: {e}"));
                return None;
            }
        };
        if let Some(reason) = response.failure_reason() {
            self.notify(NoticeLevel::Error, format!("AI generation failed: {reason}"));
            return None;
        }

        let data = response.data.unwrap_or_default();
        let mapped = map_response(step, &data);
        let outcome = GenerationOutcome {
            step,
            applied: mapped.applied,
            skipped: mapped.skipped,
        };

        if outcome.applied.is_empty() {
            self.notify(
                NoticeLevel::Warning,
                "The AI response contained nothing usable for this step",
            );
        } else {
            self.update_data(mapped.update);
            self.notify(
                NoticeLevel::Success,
                format!("Applied AI suggestions: {}", outcome.applied.join(", ")),
            );
        }
        Some(outcome)
    }

    /// Runs a whole generation for `step` against the configured service.
    pub async fn generate_for_step(&mut self, step: u8) -> Result<Option<GenerationOutcome>> {
        let Some(request) = self.begin_generation(step)? else {
            return Ok(None);
        };
        let Some(ai) = self.context.ai.clone() else {
            self.generating = None;
            return Ok(None);
        };

        let response = ai.complete(request).await;
        Ok(self.finish_generation(step, response))
    }
}
