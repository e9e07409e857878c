/// Where a field's value comes from inside an entry element.
#[derive(Debug, Clone, Copy)]
pub struct FieldSelector {
    pub css: &'static str,
    /// Read this attribute instead of the element's text.
    pub attr: Option<&'static str>,
}

impl FieldSelector {
    pub const fn text(css: &'static str) -> Self {
        Self { css, attr: None }
    }

    pub const fn attr(css: &'static str, attr: &'static str) -> Self {
        Self {
            css,
            attr: Some(attr),
        }
    }
}

/// How the album title is obtained from the album field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// The album field holds the title alone.
    Plain,
    /// The album field holds `Artist – Album`. The title is what follows the
    /// artist's own text, minus the dash-like separator.
    CombinedHeading,
}

/// Everything the pipeline needs to know about one review site.
#[derive(Debug, Clone, Copy)]
pub struct SourceDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    /// One match per candidate album.
    pub entry: &'static str,
    pub artist: FieldSelector,
    pub album: FieldSelector,
    /// Required when present.
    pub date: Option<FieldSelector>,
    pub title_rule: TitleRule,
    /// Fixed provenance tag stored as the record's rating.
    pub rating: &'static str,
}

impl SourceDescriptor {
    pub fn cache_key(&self) -> String {
        format!("scrape-{}", self.id)
    }
}

/// Best-albums listing: one table row per album, year in its own column.
pub const ALBUM_CHART: SourceDescriptor = SourceDescriptor {
    id: "album-chart",
    name: "Best Ever Albums overall chart",
    url: "https://www.besteveralbums.com/overall.php",
    entry: "table.chart-table tbody tr",
    artist: FieldSelector::text("td.chart-artist a"),
    album: FieldSelector::text("td.chart-album a"),
    date: Some(FieldSelector::text("td.chart-year")),
    title_rule: TitleRule::Plain,
    rating: "Top Rated",
};

/// Pitchfork's high scoring albums: summary cards with a publish date.
pub const PITCHFORK: SourceDescriptor = SourceDescriptor {
    id: "pitchfork",
    name: "Pitchfork high scoring albums",
    url: "https://pitchfork.com/reviews/best/high-scoring-albums/",
    entry: "div[class*='SummaryItemWrapper']",
    artist: FieldSelector::text("div[class*='SummaryItemSubHed']"),
    album: FieldSelector::text("h3[class*='SummaryItemHed']"),
    date: Some(FieldSelector::text("time[class*='PublishDate']")),
    title_rule: TitleRule::Plain,
    rating: "8.0+",
};

/// DIY's review stream: each card heading reads `Artist – Album`.
pub const DIY: SourceDescriptor = SourceDescriptor {
    id: "diy",
    name: "DIY album reviews",
    url: "https://diymag.com/reviews/album",
    entry: "article.review-card",
    artist: FieldSelector::text(".review-card__artist"),
    album: FieldSelector::text("h2.review-card__title"),
    date: Some(FieldSelector::attr("time", "datetime")),
    title_rule: TitleRule::CombinedHeading,
    rating: "DIY Featured",
};

pub const ALL_SOURCES: [SourceDescriptor; 3] = [ALBUM_CHART, PITCHFORK, DIY];

pub fn find_source(id: &str) -> Option<SourceDescriptor> {
    ALL_SOURCES
        .iter()
        .find(|source| source.id.eq_ignore_ascii_case(id))
        .copied()
}
