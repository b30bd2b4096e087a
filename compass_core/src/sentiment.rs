use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CompassConfig;
use crate::error::PerspectiveError;
use crate::llm::{extract_json, LlmClient, Message, SamplingParams};

const SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 100,
    temperature: 0.1,
    presence_penalty: None,
    frequency_penalty: None,
};

const CLASSIFIER_PROMPT: &str = "Analyze the emotional sentiment of the user's text. Return ONLY a JSON object with this exact format:\n\
{\n\
  \"emotion\": \"happy|sad|anxious|angry|neutral|excited|frustrated|overwhelmed|peaceful|confused\",\n\
  \"intensity\": 0.1-1.0,\n\
  \"confidence\": 0.1-1.0,\n\
  \"summary\": \"brief 2-3 word description\"\n\
}\n\
\n\
Focus on the primary emotion. Be precise with intensity (0.1=barely detectable, 1.0=extremely intense).";

/// The ten fixed emotion labels. Anything else the model emits collapses
/// to `Neutral` at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Excited,
    Peaceful,
    Confused,
    Sad,
    Anxious,
    Frustrated,
    Angry,
    Overwhelmed,
    #[serde(other)]
    Neutral,
}

impl Emotion {
    /// Display color for mood visualization, as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Emotion::Happy => "#22C55E",
            Emotion::Excited => "#F59E0B",
            Emotion::Peaceful => "#06B6D4",
            Emotion::Neutral => "#6B7280",
            Emotion::Confused => "#8B5CF6",
            Emotion::Sad => "#3B82F6",
            Emotion::Anxious => "#F97316",
            Emotion::Frustrated => "#EF4444",
            Emotion::Angry => "#DC2626",
            Emotion::Overwhelmed => "#EC4899",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "\u{1F60A}",
            Emotion::Excited => "\u{1F929}",
            Emotion::Peaceful => "\u{1F60C}",
            Emotion::Neutral => "\u{1F610}",
            Emotion::Confused => "\u{1F615}",
            Emotion::Sad => "\u{1F622}",
            Emotion::Anxious => "\u{1F630}",
            Emotion::Frustrated => "\u{1F624}",
            Emotion::Angry => "\u{1F620}",
            Emotion::Overwhelmed => "\u{1F92F}",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Excited => "excited",
            Emotion::Peaceful => "peaceful",
            Emotion::Neutral => "neutral",
            Emotion::Confused => "confused",
            Emotion::Sad => "sad",
            Emotion::Anxious => "anxious",
            Emotion::Frustrated => "frustrated",
            Emotion::Angry => "angry",
            Emotion::Overwhelmed => "overwhelmed",
        }
    }

    pub fn is_supportive(&self) -> bool {
        matches!(self, Emotion::Happy | Emotion::Excited | Emotion::Peaceful)
    }

    pub fn is_growth(&self) -> bool {
        matches!(
            self,
            Emotion::Confused
                | Emotion::Sad
                | Emotion::Anxious
                | Emotion::Frustrated
                | Emotion::Angry
                | Emotion::Overwhelmed
        )
    }
}

/// One classified utterance in the emotional journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub emotion: Emotion,
    pub intensity: f32,
    pub confidence: f32,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl SentimentRecord {
    /// Safe default used whenever classification fails.
    pub fn fallback() -> Self {
        Self {
            emotion: Emotion::Neutral,
            intensity: 0.5,
            confidence: 0.1,
            summary: "unknown".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of a sentiment analysis; never an error.
#[derive(Debug, Clone)]
pub struct SentimentOutcome {
    pub success: bool,
    pub record: SentimentRecord,
}

#[derive(Debug, Deserialize)]
struct RawSentiment {
    emotion: Emotion,
    intensity: f32,
    confidence: f32,
    #[serde(default)]
    summary: String,
}

/// Classifies the emotional tone of a text into the fixed label set.
#[derive(Clone)]
pub struct SentimentService {
    client: LlmClient,
}

impl SentimentService {
    pub fn new(config: &CompassConfig) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// Classify `text`. Transport and parse failures degrade to the neutral
    /// fallback; nothing escapes this boundary.
    pub async fn analyze(&self, text: &str) -> SentimentOutcome {
        match self.classify(text).await {
            Ok(record) => SentimentOutcome {
                success: true,
                record,
            },
            Err(e) => {
                tracing::warn!(kind = e.kind(), "sentiment analysis failed: {}", e);
                SentimentOutcome {
                    success: false,
                    record: SentimentRecord::fallback(),
                }
            }
        }
    }

    async fn classify(&self, text: &str) -> Result<SentimentRecord, PerspectiveError> {
        let messages = vec![
            Message::new("system", CLASSIFIER_PROMPT),
            Message::new("user", text),
        ];

        let raw = self.client.generate(messages, SAMPLING).await?;
        let parsed: RawSentiment = extract_json(&raw)?;

        Ok(SentimentRecord {
            emotion: parsed.emotion,
            intensity: round_scalar(parsed.intensity),
            confidence: round_scalar(parsed.confidence),
            summary: parsed.summary,
            timestamp: Utc::now(),
        })
    }
}

/// Round to one decimal and clamp into the documented [0.1, 1.0] range.
fn round_scalar(value: f32) -> f32 {
    ((value * 10.0).round() / 10.0).clamp(0.1, 1.0)
}
