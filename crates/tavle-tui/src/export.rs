//! Static HTML rendering of the current board.

use tavle_domain::{describe, BoardState, Card, Lane};

/// Render the board to a standalone HTML page. All issue-provided text goes
/// through HTML escaping; descriptions keep their line breaks as `<br>`.
pub fn board_page(board: &BoardState, cards: &[Card]) -> String {
    let counts = board.counts();
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n<title>tavle board</title>\n</head>\n<body>\n");
    page.push_str(&format!(
        "<p class=\"stats\">Total {} · To do {} · In progress {} · Done {}</p>\n",
        counts.total, counts.todo, counts.in_progress, counts.done
    ));

    for lane in Lane::ALL {
        page.push_str(&format!(
            "<section class=\"lane\">\n<h2>{} ({})</h2>\n",
            describe::escape_html(lane.title()),
            board.lane(lane).len()
        ));
        for key in board.lane(lane) {
            if let Some(card) = cards.iter().find(|card| card.key() == key.as_str()) {
                page.push_str(&card_article(card));
            }
        }
        page.push_str("</section>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn card_article(card: &Card) -> String {
    let issue = &card.issue;
    let mut article = String::new();
    article.push_str(&format!(
        "<article class=\"card\" id=\"card-{}\">\n",
        describe::escape_html(issue.key.as_str())
    ));
    article.push_str(&format!(
        "<h3>{} — {}</h3>\n",
        describe::escape_html(issue.key.as_str()),
        describe::escape_html(issue.summary.as_str())
    ));
    article.push_str(&format!(
        "<p class=\"meta\">{} · {} · {}</p>\n",
        describe::escape_html(issue.status_text()),
        describe::escape_html(issue.priority_text()),
        describe::escape_html(issue.assignee.as_deref().unwrap_or("—")),
    ));
    article.push_str(&format!(
        "<p class=\"description\">{}</p>\n",
        describe::render_html(issue.description.as_ref())
    ));
    if let Some(url) = issue.url.as_deref() {
        article.push_str(&format!(
            "<p><a href=\"{}\" rel=\"noopener\">Open in tracker</a></p>\n",
            describe::escape_html(url)
        ));
    }
    article.push_str("</article>\n");
    article
}
