use std::collections::HashMap;

use candle_core::{
    DType,
    Device,
    Tensor,
    D,
};
use candle_nn::{
    ops::softmax,
    VarBuilder,
};
use candle_transformers::models::modernbert::{
    Config,
    ModernBertForSequenceClassification,
};
use hf_hub::{
    api::sync::Api,
    Repo,
    RepoType,
};
use log::{
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};
use tokenizers::{
    Tokenizer,
    TruncationParams,
};

use super::SentimentClassifier;
use crate::core::{
    DashboardError,
    Result,
    Sentiment,
    SentimentLabel,
};

/// Inputs longer than this are truncated before inference.
const MAX_INPUT_TOKENS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelSize {
    #[default]
    Base,
    Large,
}

impl ModelSize {
    pub fn repo_id(&self) -> &'static str {
        match self {
            ModelSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModelSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSize::Base => write!(f, "ModernBERT base"),
            ModelSize::Large => write!(f, "ModernBERT large"),
        }
    }
}

#[derive(Deserialize)]
struct LabelConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Pre-trained three-way sentiment classifier (negative / neutral / positive).
pub struct ModernBertClassifier {
    model: ModernBertForSequenceClassification,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    device: Device,
}

impl ModernBertClassifier {
    /// Downloads (or reuses the cached) weights and tokenizer from the Hugging Face hub.
    pub fn load(size: ModelSize) -> Result<Self> {
        let device = Device::Cpu;
        let api = Api::new()?;
        let repo = api.repo(Repo::new(size.repo_id().to_string(), RepoType::Model));

        let config_path = repo.get("config.json")?;
        let tokenizer_path = repo.get("tokenizer.json")?;
        let weights_path = repo.get("model.safetensors")?;

        let config_str = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        let labels: LabelConfigJson = serde_json::from_str(&config_str)?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = ModernBertForSequenceClassification::load(vb, &config)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            DashboardError::Tokenizer(format!(
                "Failed to load tokenizer from '{}': {}",
                tokenizer_path.display(),
                e
            ))
        })?;
        let tokenizer = with_input_limit(tokenizer)?;

        info!("Loaded {} with labels {:?}", size.repo_id(), labels.id2label);

        Ok(Self { model, tokenizer, id2label: labels.id2label, device })
    }

    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self.tokenizer.encode(text, true).map_err(|e| {
            DashboardError::Tokenizer(format!(
                "Tokenization failed on '{}': {}",
                text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        Ok(probs)
    }
}

/// Truncates encodings to [`MAX_INPUT_TOKENS`], special tokens included.
fn with_input_limit(mut tokenizer: Tokenizer) -> Result<Tokenizer> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_INPUT_TOKENS,
            ..Default::default()
        }))
        .map_err(|e| DashboardError::Tokenizer(format!("Failed to set truncation: {}", e)))?;
    Ok(tokenizer)
}

impl SentimentClassifier for ModernBertClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment> {
        let probs = self.probabilities(text)?;
        sentiment_from_probabilities(&probs, &self.id2label)
    }
}

/// Picks the most probable class and maps its label onto [`SentimentLabel`].
///
/// Labels outside the three known categories fall back to `Neutral`.
pub fn sentiment_from_probabilities(
    probs: &[f32],
    id2label: &HashMap<String, String>,
) -> Result<Sentiment> {
    let (pred_id, score) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| DashboardError::Custom("Classifier returned no scores".to_string()))?;

    let raw_label = id2label.get(&pred_id.to_string()).ok_or_else(|| {
        let mut available: Vec<&String> = id2label.keys().collect();
        available.sort();
        DashboardError::Custom(format!(
            "Predicted label ID {} not in id2label. Available: {:?}",
            pred_id, available
        ))
    })?;

    let label = SentimentLabel::from_model_label(raw_label).unwrap_or_else(|| {
        warn!("Unrecognized sentiment label '{}', treating it as Neutral", raw_label);
        SentimentLabel::Neutral
    });

    Ok(Sentiment::new(label, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> HashMap<String, String> {
        [("0", "negative"), ("1", "neutral"), ("2", "positive")]
            .into_iter()
            .map(|(id, label)| (id.to_string(), label.to_string()))
            .collect()
    }

    const WORD_LEVEL_TOKENIZER: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "WhitespaceSplit"},
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
            ],
            "pair": [
                {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                {"Sequence": {"id": "B", "type_id": 1}},
                {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
            ],
            "special_tokens": {
                "[CLS]": {"id": "[CLS]", "ids": [1], "tokens": ["[CLS]"]},
                "[SEP]": {"id": "[SEP]", "ids": [2], "tokens": ["[SEP]"]}
            }
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[UNK]": 0, "[CLS]": 1, "[SEP]": 2, "great": 3},
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn test_long_input_keeps_closing_token() {
        let tokenizer: Tokenizer = WORD_LEVEL_TOKENIZER.parse().unwrap();
        let tokenizer = with_input_limit(tokenizer).unwrap();

        let text = vec!["great"; 600].join(" ");
        let encoding = tokenizer.encode(text.as_str(), true).unwrap();
        let ids = encoding.get_ids();

        assert_eq!(ids.len(), MAX_INPUT_TOKENS);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&2));
        assert_eq!(encoding.get_attention_mask().len(), MAX_INPUT_TOKENS);

        let short = tokenizer.encode("great great", true).unwrap();
        assert_eq!(short.get_ids(), &[1, 3, 3, 2]);
    }

    #[test]
    fn test_highest_probability_wins() {
        let sentiment = sentiment_from_probabilities(&[0.1, 0.2, 0.7], &labels()).unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert!((sentiment.confidence - 0.7).abs() < 1e-6);

        let sentiment = sentiment_from_probabilities(&[0.8, 0.15, 0.05], &labels()).unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_unknown_label_falls_back_to_neutral() {
        let mut id2label = labels();
        id2label.insert("3".to_string(), "mixed".to_string());

        let sentiment = sentiment_from_probabilities(&[0.1, 0.1, 0.1, 0.7], &id2label).unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
        assert!((0.0..=1.0).contains(&sentiment.confidence));
    }

    #[test]
    fn test_missing_label_id_is_an_error() {
        assert!(sentiment_from_probabilities(&[0.1, 0.1, 0.1, 0.7], &labels()).is_err());
        assert!(sentiment_from_probabilities(&[], &labels()).is_err());
    }

    #[test]
    fn test_model_size_repos() {
        assert!(ModelSize::Base.repo_id().contains("base"));
        assert!(ModelSize::Large.repo_id().contains("large"));
        assert_eq!(ModelSize::default(), ModelSize::Base);
    }
}
