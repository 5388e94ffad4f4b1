pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typr::metrics;
use typr::session::{Session, Status};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

fn prompt_spans(session: &Session) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let reference: Vec<char> = session.reference_text.chars().collect();
    let typed: Vec<char> = session.typed_text.chars().collect();
    let cursor = typed.len().min(reference.len());

    let mut spans = Vec::new();

    for (idx, &expected) in reference.iter().take(cursor).enumerate() {
        let typed_char = typed[idx];
        if typed_char == expected {
            spans.push(Span::styled(expected.to_string(), green_bold_style));
        } else {
            // make a mistyped space visible
            let shown = match typed_char {
                ' ' => "·".to_owned(),
                c => c.to_string(),
            };
            spans.push(Span::styled(shown, red_bold_style));
        }
    }

    if cursor < reference.len() {
        spans.push(Span::styled(
            reference[cursor].to_string(),
            underlined_dim_bold_style,
        ));

        let rest: String = reference[cursor + 1..].iter().collect();
        if !rest.is_empty() {
            spans.push(Span::styled(rest, dim_bold_style));
        }
    }

    spans
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let session = app.engine.session();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines = ((session.reference_text.width() as f64
        / max_chars_per_line as f64)
        .ceil()
        + 1.0) as u16;

    if session.reference_text.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
                Constraint::Length(2),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(2),
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
            ]
            .as_ref(),
        )
        .split(area);

    let header = match session.status {
        Status::Running => Span::styled(
            format!("{}", app.engine.remaining_secs()),
            dim_bold_style,
        ),
        _ => Span::styled(
            format!("enter to start · {}s", app.engine.time_limit()),
            italic_style,
        ),
    };
    Paragraph::new(header)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let prompt = Paragraph::new(Line::from(prompt_spans(session)))
        .alignment(if prompt_occupied_lines == 1 {
            // when the prompt is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    prompt.render(chunks[2], buf);

    if session.status == Status::Running {
        let accuracy = metrics::accuracy(session.total_keystrokes, session.error_count);
        let stats = Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} err",
                session.last_wpm, accuracy, session.error_count
            ),
            dim_bold_style,
        ))
        .alignment(Alignment::Center);
        stats.render(chunks[3], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let series = app.engine.history().wpm_series();
    let (sessions, highest_wpm) = charting::compute_chart_params(&series);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&series)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("session")
                .bounds([1.0, sessions])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(charting::format_label(sessions), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    if let Some(entry) = app.engine.history().last() {
        let stats = Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} err",
                entry.wpm, entry.accuracy, entry.errors
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        stats.render(chunks[1], buf);
    }

    let legend = Paragraph::new(Span::styled(
        "(r)etry / (n)ew / (esc)ape",
        italic_style,
    ));
    legend.render(chunks[3], buf);
}
