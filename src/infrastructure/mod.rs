pub mod extraction_client;

pub use extraction_client::{
    decode_error_detail, default_question, Endpoint, ExtractionClient, ExtractionRequest,
    ExtractionResponse,
};
