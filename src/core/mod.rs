pub mod correlation;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod storage;
pub mod transcription;
pub mod tts;

// Re-export commonly used types for convenience
pub use correlation::CorrelationKey;
pub use generation::{
    GenerationConfig, GenerationError, GenerationResult, PalmTextGenerator, TextGenerator,
    normalize_reply,
};
pub use pipeline::{PipelineStage, VoicePipeline};
pub use providers::{AwsSettings, load_sdk_config};
pub use storage::{AudioStore, StorageError, StorageResult, StorageSettings, StoredObject};
pub use transcription::{
    AwsTranscribeJobs, JobRequest, JobSnapshot, JobStatus, PollPolicy, TranscriptionConfig,
    TranscriptionError, TranscriptionPoller, TranscriptionResult, TranscriptionService,
};
pub use tts::{
    AwsPollySynthesizer, SpeechSynthesizer, SynthesisError, SynthesisResult, SynthesizedAudio,
};
