use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info_span, warn};

use crate::classifier::DocumentTypeClassifier;
use crate::cleaner::ArtifactCleaner;
use crate::document::{self, DocumentMetadata, GENERATOR};
use crate::error::ProcessError;
use crate::patterns::DocumentType;
use crate::quality::QualityAssessor;
use crate::report::{ProcessingResult, SkipReason};
use crate::sanitize;
use crate::segmenter::{recognised_headings, SectionSegmenter};

use super::analysis::DocumentAnalysis;
use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{ProcessingPhase, ProgressEvent, ProgressReporter};

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    cleaner: ArtifactCleaner,
    classifier: DocumentTypeClassifier,
    segmenter: SectionSegmenter,
    assessor: QualityAssessor,
}

impl Pipeline {
    pub fn from_config(config: Arc<PipelineConfig>) -> Self {
        let library = Arc::clone(&config.library);
        let cleaner = ArtifactCleaner::new(Arc::clone(&library));
        let classifier = DocumentTypeClassifier::new(Arc::clone(&library), &config.scoring);
        let assessor = QualityAssessor::new(library, config.scoring.clone());

        Self {
            config,
            cleaner,
            classifier,
            segmenter: SectionSegmenter::new(),
            assessor,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Clean, classify, segment and assess one document held in memory.
    ///
    /// Scaffolding from an earlier run (footer, placeholders, information
    /// block) is removed first. Fails only on input with no text left.
    pub fn analyze(&self, raw: &str) -> Result<DocumentAnalysis, ProcessError> {
        let text = self.cleaner.clean(&document::strip_generated(raw));
        if text.is_blank() {
            return Err(ProcessError::MalformedInput {
                reason: "document is empty after cleaning".to_string(),
            });
        }

        let classification = self.classifier.classify(&text);
        let doc_type = classification.document_type;
        let sections = self.segmenter.segment(&text, doc_type);
        let assessment = self.assessor.assess(&sections, doc_type);

        let mut warnings = Vec::new();
        if classification.is_fallback() {
            let best_score = classification
                .scores
                .iter()
                .map(|s| s.score)
                .fold(0.0, f64::max);
            warnings.push(PipelineWarning::ClassificationAmbiguous {
                best_score,
                threshold: self.config.scoring.classification_threshold,
            });
        } else if recognised_headings(&sections) == 0 {
            warnings.push(PipelineWarning::SegmentationIncomplete {
                document_type: doc_type,
            });
        }

        Ok(DocumentAnalysis {
            text,
            classification,
            sections,
            assessment,
            warnings,
        })
    }

    /// Run the full pipeline for a single file.
    /// Returns a (ProcessingResult, PipelineContext) pair.
    pub fn run(
        &self,
        mut ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> (ProcessingResult, PipelineContext) {
        let filename = sanitize::redact_path(&ctx.job.source_path);
        let _pipeline_span = info_span!("pipeline",
            job_id = %ctx.job.id,
            filename = %filename,
        )
        .entered();

        // Step 1: Read source
        let raw = {
            let _step = info_span!("read_document").entered();
            progress.report(ProgressEvent::Phase {
                phase: ProcessingPhase::Reading,
                message: "Reading document...".to_string(),
            });
            match self.step_read(&ctx) {
                Ok(raw) => raw,
                Err(e) => return self.fail(ctx, e, progress),
            }
        };

        // Step 2: Skip already processed files and dry runs
        {
            let _step = info_span!("check_processed").entered();
            if let Some(reason) = self.step_check_processed(&mut ctx, &raw) {
                debug!("Skipping {}: {}", filename, reason.describe());
                progress.report(ProgressEvent::Skipped { reason });
                let result = ProcessingResult::skipped(&ctx.job, reason)
                    .timed(ctx.started_at, ctx.started.elapsed());
                ctx.raw_text = Some(raw);
                return (result, ctx);
            }
        }

        // Step 3: Analyze
        let analysis = {
            let _step = info_span!("analyze").entered();
            progress.report(ProgressEvent::Phase {
                phase: ProcessingPhase::Analyzing,
                message: "Cleaning, classifying and assessing...".to_string(),
            });
            match self.analyze(&raw) {
                Ok(analysis) => analysis,
                Err(e) => return self.fail(ctx, e.into(), progress),
            }
        };
        for warning in &analysis.warnings {
            warn!("{}: {}", filename, warning);
        }
        ctx.warnings.extend(analysis.warnings.iter().cloned());

        // Step 4: Render canonical layout with footer
        let rendered = {
            let _step = info_span!("render").entered();
            progress.report(ProgressEvent::Phase {
                phase: ProcessingPhase::Rendering,
                message: "Rendering canonical layout...".to_string(),
            });
            match self.step_render(&ctx, &analysis) {
                Ok(rendered) => rendered,
                Err(e) => return self.fail(ctx, e, progress),
            }
        };

        // Step 5: Write back
        if self.config.options.write_back {
            let _step = info_span!("write_back").entered();
            progress.report(ProgressEvent::Phase {
                phase: ProcessingPhase::Writing,
                message: "Writing document...".to_string(),
            });
            if let Err(e) = self.step_write(&ctx, &rendered) {
                return self.fail(ctx, e, progress);
            }
        }

        let classification = &analysis.classification;
        debug!(
            "Processed {} as {} (confidence {:.3}, {} quality)",
            filename,
            classification.document_type.slug(),
            classification.confidence,
            analysis.assessment.bucket
        );
        progress.report(ProgressEvent::Completed {
            document_type: classification.document_type,
            bucket: analysis.assessment.bucket,
        });

        let result = ProcessingResult::processed(
            &ctx.job,
            classification.document_type,
            classification.confidence,
            analysis.assessment.clone(),
            ctx.warnings.clone(),
        )
        .timed(ctx.started_at, ctx.started.elapsed());

        ctx.raw_text = Some(raw);
        ctx.analysis = Some(analysis);
        ctx.rendered = Some(rendered);
        (result, ctx)
    }

    fn fail(
        &self,
        ctx: PipelineContext,
        error: PipelineError,
        progress: &dyn ProgressReporter,
    ) -> (ProcessingResult, PipelineContext) {
        let message = error.to_string();
        warn!(
            "Failed to process {}: {}",
            sanitize::redact_path(&ctx.job.source_path),
            message
        );
        progress.report(ProgressEvent::Failed {
            error: message.clone(),
        });
        let result =
            ProcessingResult::failed(&ctx.job, message).timed(ctx.started_at, ctx.started.elapsed());
        (result, ctx)
    }

    fn step_read(&self, ctx: &PipelineContext) -> Result<String, PipelineError> {
        let path = &ctx.job.source_path;
        let bytes = std::fs::read(path).map_err(|source| ProcessError::ReadDocument {
            path: path.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| {
            PipelineError::Processing(ProcessError::MalformedInput {
                reason: "file is not valid UTF-8".to_string(),
            })
        })
    }

    fn step_check_processed(&self, ctx: &mut PipelineContext, raw: &str) -> Option<SkipReason> {
        let options = self.config.options;
        if document::is_already_processed(raw) {
            if !options.force {
                return Some(SkipReason::AlreadyProcessed);
            }
            ctx.previous_metadata = document::parse_footer(raw);
        }
        if options.dry_run {
            return Some(SkipReason::DryRun);
        }
        None
    }

    fn step_render(
        &self,
        ctx: &PipelineContext,
        analysis: &DocumentAnalysis,
    ) -> Result<String, PipelineError> {
        let doc_type: DocumentType = analysis.classification.document_type;
        let source = &ctx.job.source_path;
        let position = document::extract_position(&analysis.text, source, doc_type);
        let body = document::render_document(doc_type, &position, &analysis.sections);

        let now = Utc::now();
        let metadata = DocumentMetadata {
            created_at: now,
            updated_at: now,
            generator: GENERATOR.to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            document_type: doc_type.slug().to_string(),
            confidence: analysis.classification.confidence,
            position: sanitize::slug(&position),
            department: document::extract_department(source),
            quality_bucket: analysis.assessment.bucket.as_str().to_string(),
            overall_score: analysis.assessment.overall,
        }
        .carry_over(ctx.previous_metadata.as_ref());

        let footer = document::render_footer(&metadata).map_err(ProcessError::Metadata)?;
        Ok(format!("{}\n\n{}\n", body, footer))
    }

    fn step_write(&self, ctx: &PipelineContext, rendered: &str) -> Result<(), PipelineError> {
        let path = &ctx.job.source_path;
        std::fs::write(path, rendered).map_err(|source| {
            PipelineError::Write(ProcessError::WriteDocument {
                path: path.clone(),
                source,
            })
        })
    }
}
