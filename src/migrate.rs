//! Directory migration from Markdown files into database pages.
//!
//! Posts are read from `<source>/blog` and `<source>/stories`. Each file is
//! planned first (pure parsing, no I/O beyond reading the file) and then
//! executed against a [`NotionApi`] and an [`ObjectStore`]. Images referenced
//! by the posts are looked up under the public directory and uploaded to
//! `migration/<file name>`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chunk::{append_in_chunks, DEFAULT_CHUNK_SIZE};
use crate::frontmatter;
use crate::markdown::{self, ParsedBlock};
use crate::notion::{Block, BlogPostProperties, CreatedPage, NotionApi};
use crate::storage::{upload_file, ObjectStore};

/// Key prefix for images uploaded during migration.
pub const UPLOAD_PREFIX: &str = "migration/";

/// Where a post came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Blog,
    Story,
}

impl PostKind {
    pub const ALL: [PostKind; 2] = [PostKind::Blog, PostKind::Story];

    /// Subdirectory of the source tree holding this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Story => "stories",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blog => write!(f, "blog"),
            Self::Story => write!(f, "story"),
        }
    }
}

/// Everything needed to create one page.
#[derive(Debug, Clone)]
pub struct PostPlan {
    pub path: PathBuf,
    pub kind: PostKind,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub date: String,
    pub tags: Vec<String>,
    pub cover_src: Option<String>,
    pub body_chars: usize,
    pub blocks: Vec<ParsedBlock>,
}

impl PostPlan {
    pub fn properties(&self, cover_url: Option<String>) -> BlogPostProperties {
        BlogPostProperties {
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            date: self.date.clone(),
            published: true,
            tags: self.tags.clone(),
            cover_url,
        }
    }

    /// First 50 characters of the excerpt, for logs.
    pub fn excerpt_preview(&self) -> String {
        self.excerpt.chars().take(50).collect()
    }
}

/// Build the plan for one Markdown file.
pub fn plan_post(path: &Path, kind: PostKind, today: &str) -> Result<PostPlan> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read post from {}", path.display()))?;
    let doc = frontmatter::parse(&String::from_utf8_lossy(&bytes));

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(PostPlan {
        path: path.to_path_buf(),
        kind,
        title: doc.text("title").map(str::to_string).unwrap_or_else(|| stem.clone()),
        slug: doc.text("slug").map(str::to_string).unwrap_or(stem),
        excerpt: doc.text("description").unwrap_or_default().to_string(),
        date: doc
            .text("published_date")
            .or_else(|| doc.text("date"))
            .unwrap_or(today)
            .to_string(),
        tags: doc.list("tags").map(<[String]>::to_vec).unwrap_or_default(),
        cover_src: doc.text("image").map(str::to_string),
        body_chars: doc.body.chars().count(),
        blocks: markdown::to_blocks(&doc.body),
    })
}

/// Markdown files of one kind, sorted by file name. A missing directory
/// yields no files.
pub fn list_posts(source_dir: &Path, kind: PostKind) -> Result<Vec<PathBuf>> {
    let dir = source_dir.join(kind.dir_name());
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "source directory missing, skipping");
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/*.md",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid glob pattern {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| !p.is_dir())
        .collect();
    files.sort();
    Ok(files)
}

/// Turns image references from posts into public URLs.
pub struct ImageResolver<'a> {
    store: &'a dyn ObjectStore,
    public_dir: PathBuf,
}

impl<'a> ImageResolver<'a> {
    pub fn new(store: &'a dyn ObjectStore, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            public_dir: public_dir.into(),
        }
    }

    /// Local path for a site-relative source such as `/images/foo.png`.
    pub fn local_path(&self, src: &str) -> PathBuf {
        self.public_dir.join(src.trim_start_matches('/'))
    }

    /// Resolve `src` to a URL. Absolute URLs pass through; local files are
    /// uploaded. Missing files and failed uploads yield `None`.
    pub fn resolve(&self, src: &str) -> Option<String> {
        if src.is_empty() {
            return None;
        }
        if src.starts_with("http") {
            return Some(src.to_string());
        }

        let local = self.local_path(src);
        if !local.is_file() {
            tracing::warn!(path = %local.display(), "image not found");
            return None;
        }

        let file_name = local.file_name()?.to_string_lossy().to_string();
        let key = format!("{}{}", UPLOAD_PREFIX, file_name);
        match upload_file(self.store, &local, Some(&key)) {
            Ok(upload) => Some(upload.url),
            Err(e) => {
                tracing::warn!(path = %local.display(), error = %e, "failed to upload image");
                None
            }
        }
    }

    /// Replace image placeholders with image blocks, or with the literal
    /// Markdown when the image cannot be resolved.
    pub fn resolve_blocks(&self, blocks: Vec<ParsedBlock>) -> Vec<Block> {
        blocks
            .into_iter()
            .map(|parsed| match parsed {
                ParsedBlock::Ready(block) => block,
                ParsedBlock::Image { alt, src } => match self.resolve(&src) {
                    Some(url) => Block::Image {
                        url,
                        caption: Some(alt),
                    },
                    None => ParsedBlock::image_fallback(&alt, &src),
                },
            })
            .collect()
    }
}

/// A file that could not be migrated.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub title: String,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub created: Vec<CreatedPage>,
    pub planned: usize,
    pub failures: Vec<Failure>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Receives progress while a migration runs. The CLI prints through this;
/// tests use the no-op implementation.
pub trait MigrationObserver {
    fn planned(&mut self, _plan: &PostPlan) {}
    fn created(&mut self, _plan: &PostPlan, _page: &CreatedPage) {}
    fn failed(&mut self, _path: &Path, _title: &str, _error: &anyhow::Error) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl MigrationObserver for Silent {}

pub struct Migrator<'a> {
    notion: &'a dyn NotionApi,
    images: ImageResolver<'a>,
    database_id: String,
    chunk_size: usize,
}

impl<'a> Migrator<'a> {
    pub fn new(
        notion: &'a dyn NotionApi,
        images: ImageResolver<'a>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            notion,
            images,
            database_id: database_id.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Create the page for one plan and append its body.
    ///
    /// A page that was created but whose body failed to append is left in
    /// place; the error is returned.
    pub fn migrate_post(&self, plan: &PostPlan) -> Result<CreatedPage> {
        let cover_url = plan
            .cover_src
            .as_deref()
            .and_then(|src| self.images.resolve(src));

        let page = plan.properties(cover_url).into_page(&self.database_id);
        let created = self
            .notion
            .create_page(&page)
            .with_context(|| format!("Failed to create page for {}", plan.title))?;

        let blocks = self.images.resolve_blocks(plan.blocks.clone());
        let block_count = blocks.len();
        let batches = append_in_chunks(self.notion, &created.id, blocks, self.chunk_size)
            .with_context(|| format!("Failed to append content to {}", plan.title))?;

        tracing::info!(
            page_id = %created.id,
            blocks = block_count,
            batches,
            kind = %plan.kind,
            "post migrated"
        );
        Ok(created)
    }

    /// Migrate every post under `source_dir`, continuing past failures.
    pub fn run(
        &self,
        source_dir: &Path,
        today: &str,
        observer: &mut dyn MigrationObserver,
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for kind in PostKind::ALL {
            for path in list_posts(source_dir, kind)? {
                let plan = match plan_post(&path, kind, today) {
                    Ok(plan) => plan,
                    Err(error) => {
                        let title = file_title(&path);
                        observer.failed(&path, &title, &error);
                        report.failures.push(Failure { path, title, error });
                        continue;
                    }
                };
                report.planned += 1;
                observer.planned(&plan);

                match self.migrate_post(&plan) {
                    Ok(page) => {
                        observer.created(&plan, &page);
                        report.created.push(page);
                    }
                    Err(error) => {
                        observer.failed(&path, &plan.title, &error);
                        report.failures.push(Failure {
                            path,
                            title: plan.title,
                            error,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}

/// Posts that parsed, and the files that could not be planned.
#[derive(Debug, Default)]
pub struct DryRun {
    pub plans: Vec<PostPlan>,
    pub failures: Vec<Failure>,
}

/// Plan every post without touching any remote service. Unreadable files are
/// collected as failures, as a real run would record them.
pub fn plan_all(source_dir: &Path, today: &str) -> Result<DryRun> {
    let mut dry_run = DryRun::default();
    for kind in PostKind::ALL {
        for path in list_posts(source_dir, kind)? {
            match plan_post(&path, kind, today) {
                Ok(plan) => dry_run.plans.push(plan),
                Err(error) => dry_run.failures.push(Failure {
                    title: file_title(&path),
                    path,
                    error,
                }),
            }
        }
    }
    Ok(dry_run)
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
