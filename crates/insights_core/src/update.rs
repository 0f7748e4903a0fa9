use crate::{
    build_enriched_content, extract_candidate_title, strip_bylines, Effect, FileJob, Msg,
    SkipReason, Stage,
};

/// Pure update function: applies a message to a job and returns any effects.
///
/// Messages that do not fit the job's current stage are ignored. Terminal
/// jobs never change again.
pub fn update(mut job: FileJob, msg: Msg) -> (FileJob, Vec<Effect>) {
    if job.stage().is_terminal() {
        return (job, Vec::new());
    }

    let effects = match (job.stage(), msg) {
        (_, Msg::StepFailed { reason }) => {
            job.skip(reason);
            Vec::new()
        }
        (Stage::Pending, Msg::ContentLoaded(raw)) => {
            let content = strip_bylines(&raw);
            let title = extract_candidate_title(&content);
            job.set_content(content);
            match title {
                Some(title) => {
                    let effect = Effect::ResolveTitle {
                        title: title.text.clone(),
                    };
                    job.set_title(title);
                    job.set_stage(Stage::TitleExtracted);
                    vec![effect]
                }
                None => {
                    job.skip(SkipReason::NoTitle);
                    Vec::new()
                }
            }
        }
        (Stage::TitleExtracted, Msg::TitleResolved { paper_id }) => match paper_id {
            Some(paper_id) if !is_plain_paper_id(&paper_id) => {
                job.skip(SkipReason::UnsafePaperId);
                Vec::new()
            }
            Some(paper_id) => {
                job.set_paper_id(paper_id.clone());
                job.set_stage(Stage::Resolved);
                vec![Effect::FetchRecord { paper_id }]
            }
            None => {
                job.skip(SkipReason::NoMatch);
                Vec::new()
            }
        },
        (Stage::Resolved, Msg::RecordFetched { record }) => match record {
            Some(record) => {
                job.set_stage(Stage::Fetched);
                let enriched = build_enriched_content(&record, job.content().unwrap_or_default());
                let file_name = format!("{}.txt", job.paper_id().unwrap_or(&record.paper_id));
                job.set_enriched(enriched.clone());
                job.set_stage(Stage::Enriched);
                vec![Effect::WriteEnriched {
                    file_name,
                    content: enriched,
                }]
            }
            None => {
                job.skip(SkipReason::FetchFailed);
                Vec::new()
            }
        },
        (Stage::Enriched, Msg::EnrichedWritten) => vec![Effect::MoveToProcessed {
            file_name: job.file_name().to_string(),
        }],
        (Stage::Enriched, Msg::SourceMoved) => {
            job.set_stage(Stage::Moved);
            Vec::new()
        }
        _ => Vec::new(),
    };

    (job, effects)
}

/// Paper ids name the collection file, so only ASCII letters and digits pass.
fn is_plain_paper_id(paper_id: &str) -> bool {
    !paper_id.is_empty() && paper_id.bytes().all(|b| b.is_ascii_alphanumeric())
}
