//! Colored terminal output utilities.

use console::{Style, Term};
use smap_sitemap::{RunReport, SiteOutcome};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&self.cyan_bold, msg);
    }

    /// Print one line per site of a generation run.
    pub(crate) fn report(&self, report: &RunReport) {
        for site in &report.sites {
            self.site(site);
        }

        let failed = report.failures().count();
        let published = report.sites.len() - failed;
        let summary = format!("{published} published, {failed} failed");
        if failed == 0 {
            self.styled(&self.green, &summary);
        } else {
            self.styled(&self.red, &summary);
        }
    }

    fn site(&self, site: &SiteOutcome) {
        if let Some(err) = &site.error {
            self.error(&format!("  {}: {err}", site.domain));
            return;
        }

        let path = site
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.styled(
            &self.green,
            &format!("  {}: {} URLs, {} images -> {path}", site.domain, site.urls, site.images),
        );
        match site.notified {
            Some(true) => self.info(&format!("  {}: search engines notified", site.domain)),
            Some(false) => self.warning(&format!("  {}: search engine notification failed", site.domain)),
            None => {}
        }
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
