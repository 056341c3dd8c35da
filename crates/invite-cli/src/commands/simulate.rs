use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use invite_core::headless::{RecordingAudio, RecordingView, SimulatedLibrary};
use invite_core::{
    Controller, InviteConfig, InviteEventKind, Key, Point, Timeline, Viewport, VirtualClock,
};

const MAX_EVENTS: usize = 500;

/// Flags of the `simulate` command.
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
    /// Run at least until this time.
    pub until: u64,
    /// `@ms:action` steps.
    pub script: Option<&'a str>,
    /// Pretend the turn library is loaded.
    pub library: bool,
    /// TOML config file.
    pub config: Option<&'a Path>,
    /// List every event, not just the notable ones.
    pub events: bool,
    /// Print a JSON summary instead of the report.
    pub json: bool,
}

/// One scripted user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Trigger the door by hand.
    Door,
    /// Click the invitation.
    Tap,
    /// Next-page button.
    Next,
    /// Previous-page button.
    Prev,
    /// Back to the invitation.
    Back,
    /// Jump to a page.
    Page(u32),
    /// A key press.
    Key(Key),
    /// A swipe by this displacement.
    Swipe {
        /// Horizontal travel.
        dx: f64,
        /// Vertical travel.
        dy: f64,
    },
    /// The window was resized.
    Resize(Viewport),
}

/// An action and when it happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Session time of the action.
    pub at_ms: u64,
    /// What the user does.
    pub action: Action,
}

fn parse_number(text: &str, what: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {what} '{text}'"))
}

fn parse_action(text: &str) -> Result<Action, String> {
    let mut parts = text.split(':');
    let name = parts.next().unwrap_or_default();
    let action = match name {
        "door" => Action::Door,
        "tap" => Action::Tap,
        "next" => Action::Next,
        "prev" => Action::Prev,
        "back" => Action::Back,
        "page" => {
            let page = parts.next().ok_or("page needs a number, e.g. page:7")?;
            Action::Page(
                page.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("invalid page '{page}'"))?,
            )
        }
        "key" => {
            let key = parts.next().ok_or("key needs a name, e.g. key:ArrowRight")?;
            // "Space" reads better on a command line than " ".
            let dom = if key == "Space" { " " } else { key };
            Action::Key(Key::from_dom(dom))
        }
        "swipe" => {
            let dx = parts.next().ok_or("swipe needs dx and dy, e.g. swipe:-80:0")?;
            let dy = parts.next().ok_or("swipe needs dx and dy, e.g. swipe:-80:0")?;
            Action::Swipe {
                dx: parse_number(dx, "swipe dx")?,
                dy: parse_number(dy, "swipe dy")?,
            }
        }
        "resize" => {
            let size = parts.next().ok_or("resize needs a size, e.g. resize:1280x800")?;
            let (w, h) = size
                .split_once('x')
                .ok_or_else(|| format!("invalid size '{size}', expected WxH"))?;
            Action::Resize(Viewport::new(
                parse_number(w, "width")?,
                parse_number(h, "height")?,
            ))
        }
        other => return Err(format!("unknown action '{other}'")),
    };
    if parts.next().is_some() {
        return Err(format!("trailing arguments in '{text}'"));
    }
    Ok(action)
}

/// Parse `@ms:action` steps separated by commas. Times must not go back.
pub fn parse_script(script: &str) -> Result<Vec<Step>, String> {
    let mut steps: Vec<Step> = Vec::new();
    for raw in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let body = raw
            .strip_prefix('@')
            .ok_or_else(|| format!("step '{raw}' must start with '@'"))?;
        let (at, action) = body
            .split_once(':')
            .ok_or_else(|| format!("step '{raw}' must look like @ms:action"))?;
        let at_ms = at
            .parse::<u64>()
            .map_err(|_| format!("invalid time '{at}' in step '{raw}'"))?;
        if let Some(prev) = steps.last()
            && at_ms < prev.at_ms
        {
            return Err(format!(
                "step '{raw}' is earlier than the previous step at {}ms",
                prev.at_ms
            ));
        }
        steps.push(Step {
            at_ms,
            action: parse_action(action)?,
        });
    }
    Ok(steps)
}

fn load_config(path: Option<&Path>) -> Result<InviteConfig, String> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            toml::from_str::<InviteConfig>(&text)
                .map_err(|e| format!("invalid config {}: {e}", path.display()))?
        }
        None => InviteConfig::default(),
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn apply(controller: &mut Controller<RecordingView>, action: Action) -> Result<(), String> {
    match action {
        Action::Door => controller.open_door(),
        Action::Tap => controller.go_to_flipbook(),
        Action::Next => controller.next_page(),
        Action::Prev => controller.previous_page(),
        Action::Back => controller.go_back_to_invitation(),
        Action::Page(page) => controller.go_to_page(page).map_err(|e| e.to_string())?,
        Action::Key(key) => {
            controller.key_down(key);
        }
        Action::Swipe { dx, dy } => {
            controller.touch_start(Point::new(0.0, 0.0));
            controller.touch_end(Point::new(dx, dy));
        }
        Action::Resize(viewport) => controller.resize(viewport),
    }
    Ok(())
}

/// Run a headless session and print what happened.
pub fn run(opts: &Options<'_>) -> Result<(), String> {
    let config = load_config(opts.config)?;
    let steps = match opts.script {
        Some(script) => parse_script(script)?,
        None => Vec::new(),
    };
    let viewport = Viewport::new(opts.width, opts.height);

    let clock = VirtualClock::new();
    let view = RecordingView::new(config.total_pages);
    let mut controller = Controller::new(config, view, clock.clone())
        .with_audio(RecordingAudio::new())
        .with_max_events(MAX_EVENTS);
    if opts.library {
        controller = controller.with_turner_factory(SimulatedLibrary);
    }

    let mut timeline = Timeline::new(controller, clock);
    timeline.start(viewport);
    for step in &steps {
        timeline.advance_to(step.at_ms);
        tracing::debug!(at_ms = step.at_ms, action = ?step.action, "script step");
        timeline
            .act(|c| apply(c, step.action))
            .map_err(|e| format!("step @{}ms: {e}", step.at_ms))?;
    }
    let end = opts.until.max(steps.last().map_or(0, |s| s.at_ms));
    timeline.advance_to(end);

    let controller = timeline.controller();
    if opts.json {
        print_json(controller, end, viewport)
    } else {
        print_report(controller, end, viewport, opts.events);
        Ok(())
    }
}

fn print_json(
    controller: &Controller<RecordingView>,
    end: u64,
    viewport: Viewport,
) -> Result<(), String> {
    let events: Vec<_> = controller
        .events()
        .events()
        .iter()
        .map(|e| serde_json::json!({ "at_ms": e.at_ms, "event": e.description }))
        .collect();
    let summary = serde_json::json!({
        "viewport": viewport,
        "ended_at_ms": end,
        "screen": controller.screen(),
        "page": controller.current_page(),
        "total_pages": controller.config().total_pages,
        "viewer": controller.turner_kind().map(|k| format!("{k:?}")),
        "events": events,
    });
    let text = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn print_report(
    controller: &Controller<RecordingView>,
    end: u64,
    viewport: Viewport,
    all_events: bool,
) {
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({viewport} until {end}ms)").dimmed()
    );
    println!("  Screen: {}", controller.screen());
    println!("  Page:   {}", controller.view().page_info());
    if let Some(kind) = controller.turner_kind() {
        println!("  Viewer: {kind:?}");
    }
    println!();

    let log = controller.events();
    let rows: Vec<_> = log
        .events()
        .iter()
        .filter(|e| all_events || is_notable(&e.kind))
        .collect();
    if rows.is_empty() {
        println!("  {}", "(no events)".dimmed());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Event"]);
    for event in rows {
        table.add_row(vec![format!("{}ms", event.at_ms), event.description.clone()]);
    }
    println!("{table}");
    println!();
    println!("  {} events logged", log.len());
}

fn is_notable(kind: &InviteEventKind) -> bool {
    matches!(
        kind,
        InviteEventKind::ScreenChanged { .. }
            | InviteEventKind::PageChanged { .. }
            | InviteEventKind::CueFailed { .. }
            | InviteEventKind::ViewerBuilt { .. }
    )
}
