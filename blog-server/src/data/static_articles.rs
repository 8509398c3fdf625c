//! Long-form articles compiled into the binary. They have no lifecycle and are
//! always public; comments can still be attached to their slugs.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::domain::article::{Article, ContentSource, snippet_of};
use crate::domain::post::PostStatus;

pub struct StaticArticle {
    pub slug: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    /// `YYYY-MM-DD`
    pub date: &'static str,
    pub read_time: &'static str,
    pub tags: &'static [&'static str],
    pub body: &'static str,
}

impl StaticArticle {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        NaiveDate::parse_from_str(self.date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn to_article(&self) -> Option<Article> {
        let Some(date) = self.published_at() else {
            warn!(slug = self.slug, date = self.date, "bundled article has an unreadable date");
            return None;
        };
        Some(Article {
            id: None,
            slug: self.slug.to_string(),
            title: self.title.to_string(),
            content: self.body.to_string(),
            excerpt: None,
            snippet: snippet_of(self.body),
            status: PostStatus::Published,
            published_at: date,
            created_at: None,
            updated_at: None,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            author: self.author.to_string(),
            date,
            read_time: self.read_time.to_string(),
            featured_image: None,
            meta_description: None,
            source: Some(ContentSource::Static),
        })
    }
}

pub static ARTICLES: &[StaticArticle] = &[
    StaticArticle {
        slug: "how-to-approach-lsat-logical-reasoning",
        title: "How to Approach LSAT Logical Reasoning",
        author: "Editorial Team",
        date: "2025-01-15",
        read_time: "6 min read",
        tags: &["LSAT", "Logical Reasoning", "Strategy"],
        body: r#"<p>Logical Reasoning makes up roughly half of your scored LSAT, so a repeatable process matters more than any single trick.</p>
<h2>Read the question stem first</h2>
<p>The stem tells you what job the stimulus is about to do. A flaw question asks you to read as a critic; a must-be-true question asks you to read as a notary. Knowing which role you are playing before the first sentence saves you a second read.</p>
<h2>Find the conclusion, then the support</h2>
<p>Most arguments reduce to one claim and the evidence offered for it. Label them. If you cannot say the conclusion in a dozen words, you have not found it yet.</p>
<h2>Predict before you look</h2>
<p>Before reading the answer choices, say what a correct answer would roughly do. Wrong answers are written to look attractive to someone without a prediction.</p>
<h2>Review by category</h2>
<p>After each timed section, sort your misses by question type. Patterns show up fast: most students lose points to two or three types, not to the whole section.</p>"#,
    },
    StaticArticle {
        slug: "mastering-reading-comprehension",
        title: "Mastering Reading Comprehension Without Rereading",
        author: "Editorial Team",
        date: "2025-02-03",
        read_time: "5 min read",
        tags: &["LSAT", "Reading Comprehension"],
        body: r#"<p>Rereading is the most expensive habit on the Reading Comprehension section. The fix is active reading on the first pass.</p>
<h2>Map the passage as you go</h2>
<p>Jot one short note per paragraph: what it does, not what it says. "Introduces critics' view" is more useful later than a summary of the critics' view.</p>
<h2>Track the author's voice</h2>
<p>Questions reward knowing where the author stands. Watch for evaluative words such as <em>unfortunately</em>, <em>compelling</em> or <em>overstated</em>; they mark the author's position.</p>
<h2>Answer from the passage</h2>
<p>Every correct answer is supported by text you can point to. If you cannot point to it, it is outside knowledge, and outside knowledge is a trap.</p>"#,
    },
    StaticArticle {
        slug: "building-an-lsat-study-schedule",
        title: "Building an LSAT Study Schedule That Survives Real Life",
        author: "Editorial Team",
        date: "2025-03-10",
        read_time: "4 min read",
        tags: &["LSAT", "Study Plan"],
        body: r#"<p>A plan that assumes perfect weeks fails by the second week. Build one that expects interruptions.</p>
<h2>Anchor on practice tests</h2>
<p>Schedule a full timed test every one to two weeks and treat the days between as review and drilling driven by that test's results.</p>
<h2>Keep sessions short and frequent</h2>
<p>Five focused ninety-minute sessions beat one exhausted Saturday. Consistency builds the pattern recognition the test rewards.</p>
<h2>Leave slack</h2>
<p>Reserve one day a week with nothing planned. When life takes a session, that day absorbs it instead of the whole plan sliding.</p>"#,
    },
    StaticArticle {
        slug: "lsat-test-day-checklist",
        title: "The LSAT Test Day Checklist",
        author: "Editorial Team",
        date: "2025-04-21",
        read_time: "3 min read",
        tags: &["LSAT", "Test Day"],
        body: r#"<p>Points are lost on test day to things that have nothing to do with logic. Remove them in advance.</p>
<h2>The night before</h2>
<p>Confirm your check-in time, test your equipment if testing remotely, and set out identification. Do not take a full practice test.</p>
<h2>The morning of</h2>
<p>Eat something you have eaten before a practice test. Warm up with a handful of questions you have already solved so your first live question is not your first question of the day.</p>
<h2>During the test</h2>
<p>Skip and return. A single hard question is worth exactly as much as an easy one, and it should never cost you the three after it.</p>"#,
    },
];

pub fn find(slug: &str) -> Option<&'static StaticArticle> {
    ARTICLES.iter().find(|a| a.slug == slug)
}
