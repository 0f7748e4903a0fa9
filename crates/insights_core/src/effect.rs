#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResolveTitle { title: String },
    FetchRecord { paper_id: String },
    WriteEnriched { file_name: String, content: String },
    MoveToProcessed { file_name: String },
}
