//! Builder patterns for creating test data programmatically.
//!
//! These builders allow creating configurations and Markdown documents
//! without repetitive boilerplate code.

#![allow(dead_code)]

use docxmd::config::{default_artifact_rules, load_default_config, ArtifactRule, Config};

/// Builder for creating `Config` instances on top of the built-in defaults.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: load_default_config().expect("default config"),
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.config.version = version.to_string();
        self
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Appends a rule after the built-in table.
    pub fn artifact(mut self, id: &str, pattern: &str, replacement: &str) -> Self {
        if self.config.artifacts.is_empty() {
            self.config.artifacts = default_artifact_rules().expect("built-in rules");
        }
        self.config.artifacts.push(ArtifactRule {
            id: id.to_string(),
            description: String::new(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        });
        self
    }

    pub fn min_section_words(mut self, words: usize) -> Self {
        self.config.scoring.min_section_words = words;
        self
    }

    pub fn classification_threshold(mut self, threshold: f64) -> Self {
        self.config.scoring.classification_threshold = threshold;
        self
    }

    pub fn protected_file(mut self, pattern: &str) -> Self {
        self.config.safety.protected_files.push(pattern.to_string());
        self
    }

    pub fn protected_directory(mut self, name: &str) -> Self {
        self.config.safety.protected_directories.push(name.to_string());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for Markdown documents shaped like converter output.
pub struct DocumentBuilder {
    title: Option<String>,
    preamble: Vec<String>,
    sections: Vec<(String, String)>,
    numbered: bool,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            preamble: Vec::new(),
            sections: Vec::new(),
            numbered: true,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Raw lines placed before the title, such as a converter banner.
    pub fn preamble(mut self, line: &str) -> Self {
        self.preamble.push(line.to_string());
        self
    }

    pub fn section(mut self, heading: &str, body: &str) -> Self {
        self.sections.push((heading.to_string(), body.to_string()));
        self
    }

    pub fn unnumbered(mut self) -> Self {
        self.numbered = false;
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push_str("\n\n");
        }
        if let Some(title) = &self.title {
            out.push_str(&format!("# {}\n\n", title));
        }
        for (i, (heading, body)) in self.sections.iter().enumerate() {
            if self.numbered {
                out.push_str(&format!("## {}. {}\n{}\n\n", i + 1, heading, body));
            } else {
                out.push_str(&format!("## {}\n{}\n\n", heading, body));
            }
        }
        out
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Job description with the first three canonical sections filled.
pub fn partial_job_description() -> String {
    DocumentBuilder::new()
        .title("Должностная инструкция бухгалтера")
        .section(
            "Общие положения",
            "Бухгалтер относится к категории специалистов и подчиняется главному бухгалтеру организации.",
        )
        .section(
            "Должностные обязанности",
            "Работник ведет учет хозяйственных операций, принимает первичные документы и готовит отчетность.",
        )
        .section(
            "Права",
            "Работник имеет право запрашивать у подразделений сведения, необходимые для выполнения обязанностей.",
        )
        .build()
}

/// Job description with every canonical section filled.
pub fn complete_job_description() -> String {
    DocumentBuilder::new()
        .title("Должностная инструкция бухгалтера")
        .section(
            "Общие положения",
            "Бухгалтер относится к категории специалистов и подчиняется главному бухгалтеру организации.",
        )
        .section(
            "Функции",
            "Ведение учета хозяйственных операций и подготовка регламентированной отчетности предприятия.",
        )
        .section(
            "Должностные обязанности",
            "Работник принимает первичные документы, проверяет их оформление и отражает операции в регистрах.",
        )
        .section(
            "Права",
            "Работник имеет право запрашивать у подразделений сведения, необходимые для выполнения обязанностей.",
        )
        .section(
            "Ответственность",
            "Работник несет ответственность за ненадлежащее исполнение обязанностей в пределах законодательства.",
        )
        .section(
            "Заключительные положения",
            "Инструкция вступает в силу с момента утверждения и действует до ее замены новой редакцией.",
        )
        .section(
            "Согласование и утверждение",
            "Инструкция согласована с юридическим отделом и утверждена приказом генерального директора.",
        )
        .build()
}
