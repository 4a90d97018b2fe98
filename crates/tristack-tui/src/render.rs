use crate::app::{App, ScreenState};
use crate::theme::Theme;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use tristack_core::{Difficulty, Grid, RevealStep, Verdict, GRID_SIZE, SELECTION_SIZE};

/// Width of a drawn grid including its frame
const GRID_WIDTH: u16 = 2 + GRID_SIZE as u16 * 2;
/// Height of a drawn grid including its frame
const GRID_HEIGHT: u16 = 2 + GRID_SIZE as u16;
/// Horizontal distance between candidate grids
const CANDIDATE_STRIDE: u16 = GRID_WIDTH + 3;

const LOGO: [&str; 2] = [
    "▀█▀ █▀█ █ █▀ ▀█▀ ▄▀█ █▀▀ █▄▀",
    " █  █▀▄ █ ▄█  █  █▀█ █▄▄ █ █",
];

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    match app.screen_state {
        ScreenState::Title => render_title_screen(stdout, app, term_width)?,
        ScreenState::SignIn => render_sign_in_screen(stdout, app, term_width)?,
        ScreenState::DifficultySelect => render_difficulty_screen(stdout, app, term_width)?,
        ScreenState::Playing => render_game_screen(stdout, app, term_width)?,
        ScreenState::Reveal => render_reveal_screen(stdout, app, term_width)?,
        ScreenState::Exhausted => render_exhausted_screen(stdout, app, term_width)?,
        ScreenState::Tutorial => render_tutorial_screen(stdout, app, term_width)?,
    }

    render_confetti(stdout, app, term_width, term_height)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, &app.theme, msg, term_width, term_height)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn centered(term_width: u16, width: u16) -> u16 {
    term_width.saturating_sub(width) / 2
}

fn print_at(
    stdout: &mut io::Stdout,
    x: u16,
    y: u16,
    color: Color,
    text: &str,
) -> io::Result<()> {
    execute!(stdout, MoveTo(x, y), SetForegroundColor(color), Print(text))
}

/// Draw a framed grid with its top-left corner at `(x, y)`
fn render_grid(
    stdout: &mut io::Stdout,
    theme: &Theme,
    grid: &Grid,
    x: u16,
    y: u16,
    frame: Color,
) -> io::Result<()> {
    let bar = "─".repeat(GRID_SIZE * 2);
    print_at(stdout, x, y, frame, &format!("┌{}┐", bar))?;

    for (r, row) in grid.rows().iter().enumerate() {
        let row_y = y + 1 + r as u16;
        print_at(stdout, x, row_y, frame, "│")?;
        for cell in row {
            let text = if cell.is_ink() { "██" } else { "··" };
            execute!(stdout, SetForegroundColor(theme.cell(*cell)), Print(text))?;
        }
        execute!(stdout, SetForegroundColor(frame), Print("│"))?;
    }

    print_at(stdout, x, y + GRID_HEIGHT - 1, frame, &format!("└{}┘", bar))
}

/// Draw the candidate row with selection marks and an optional cursor
fn render_candidates(
    stdout: &mut io::Stdout,
    theme: &Theme,
    grids: &[Grid],
    selected: &[usize],
    cursor: Option<usize>,
    x: u16,
    y: u16,
) -> io::Result<()> {
    for (i, grid) in grids.iter().enumerate() {
        let gx = x + i as u16 * CANDIDATE_STRIDE;
        let frame = if cursor == Some(i) {
            theme.cursor
        } else if selected.contains(&i) {
            theme.selected
        } else {
            theme.border
        };
        render_grid(stdout, theme, grid, gx, y, frame)?;

        let label = match selected.iter().position(|&s| s == i) {
            Some(order) => format!("[{}]#{}", i + 1, order + 1),
            None => format!(" {}", i + 1),
        };
        let color = if selected.contains(&i) {
            theme.selected
        } else {
            theme.info
        };
        print_at(stdout, gx + 1, y + GRID_HEIGHT, color, &label)?;
    }
    Ok(())
}

fn candidates_width(count: usize) -> u16 {
    (count as u16 * CANDIDATE_STRIDE).saturating_sub(3)
}

fn render_header(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let title = "TRISTACK";
    print_at(stdout, 2, 0, theme.key, title)?;

    let player = format!("Player: {}", app.player_name());
    let x = term_width.saturating_sub(player.len() as u16 + 2);
    print_at(stdout, x, 0, theme.info, &player)
}

fn render_controls(
    stdout: &mut io::Stdout,
    theme: &Theme,
    controls: &[(&str, &str)],
    x: u16,
    y: u16,
) -> io::Result<()> {
    execute!(stdout, MoveTo(x, y))?;
    for (key, action) in controls {
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(key),
            SetForegroundColor(theme.info),
            Print(format!(" {}  ", action))
        )?;
    }
    Ok(())
}

fn render_menu(
    stdout: &mut io::Stdout,
    theme: &Theme,
    items: &[&str],
    selection: usize,
    x: u16,
    y: u16,
) -> io::Result<()> {
    for (i, item) in items.iter().enumerate() {
        let (marker, color) = if i == selection {
            ("> ", theme.key)
        } else {
            ("  ", theme.fg)
        };
        print_at(stdout, x, y + i as u16, color, &format!("{}{}", marker, item))?;
    }
    Ok(())
}

fn render_title_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    for (i, line) in LOGO.iter().enumerate() {
        print_at(stdout, 4, 2 + i as u16, theme.key, line)?;
    }
    print_at(
        stdout,
        4,
        5,
        theme.info,
        "Stack three grids to rebuild the target.",
    )?;

    render_menu(stdout, theme, &app.title_menu(), app.menu_selection, 4, 8)?;
    render_controls(
        stdout,
        theme,
        &[("↑↓", "Move"), ("Enter", "Select"), ("q", "Quit")],
        4,
        15,
    )?;

    if let Some(demo) = &app.demo {
        let x = 48;
        print_at(stdout, x, 2, theme.info, "Target")?;
        render_grid(stdout, theme, &demo.puzzle().target, x, 3, theme.border)?;

        let stacked = demo.reveal().map(|r| *r.current().grid()).unwrap_or_else(|| {
            let grids = demo.puzzle().grids_at(demo.selected());
            tristack_core::overlay_grids(&grids)
        });
        print_at(stdout, x + CANDIDATE_STRIDE, 2, theme.info, "Stack")?;
        render_grid(stdout, theme, &stacked, x + CANDIDATE_STRIDE, 3, theme.border)?;
        print_at(stdout, x, 9, theme.fg, demo.caption())?;
    }
    Ok(())
}

fn render_sign_in_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let x = centered(term_width, 40);
    print_at(stdout, x, 4, theme.fg, "Sign in to keep your history")?;
    print_at(
        stdout,
        x,
        5,
        theme.info,
        "Letters, digits, '-', '_' and '.' only",
    )?;
    print_at(stdout, x, 7, theme.key, &format!("Name: {}_", app.name_input))?;
    render_controls(stdout, theme, &[("Enter", "Sign in"), ("Esc", "Back")], x, 10)
}

fn render_difficulty_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let x = centered(term_width, 40);
    print_at(stdout, x, 3, theme.fg, "Choose a difficulty")?;
    let items: Vec<String> = Difficulty::all()
        .iter()
        .map(|d| format!("{:<8} {}", d.to_string(), d.blurb()))
        .collect();
    let items: Vec<&str> = items.iter().map(String::as_str).collect();
    render_menu(stdout, theme, &items, app.menu_selection, x, 5)?;
    render_controls(
        stdout,
        theme,
        &[("↑↓", "Move"), ("Enter", "Play"), ("Esc", "Back")],
        x,
        10,
    )
}

fn render_game_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let Some(round) = &app.round else {
        return Ok(());
    };
    let puzzle = round.puzzle();

    print_at(
        stdout,
        2,
        1,
        theme.info,
        &format!("{} puzzle {}", puzzle.difficulty, puzzle.id),
    )?;

    print_at(stdout, 2, 3, theme.info, "Target")?;
    render_grid(stdout, theme, &puzzle.target, 2, 4, theme.border)?;

    let preview_x = 2 + CANDIDATE_STRIDE;
    print_at(
        stdout,
        preview_x,
        3,
        theme.info,
        &format!("Stack {}/{}", round.selected().len(), SELECTION_SIZE),
    )?;
    let frame = if round.is_solved() {
        theme.success
    } else {
        theme.border
    };
    render_grid(stdout, theme, &round.preview(), preview_x, 4, frame)?;

    if let Some(verdict) = round.last_verdict() {
        let color = if verdict.is_solved() {
            theme.success
        } else {
            theme.error
        };
        print_at(stdout, preview_x + CANDIDATE_STRIDE, 6, color, verdict.message())?;
    }
    print_at(
        stdout,
        preview_x + CANDIDATE_STRIDE,
        7,
        theme.info,
        &format!("Attempts: {}", round.attempts()),
    )?;

    let grids = &puzzle.available_grids;
    let x = centered(term_width, candidates_width(grids.len())).max(2);
    print_at(stdout, x, 10, theme.info, "Candidates")?;
    render_candidates(stdout, theme, grids, round.selected(), Some(app.cursor), x, 11)?;

    render_controls(
        stdout,
        theme,
        &[
            ("←→", "Move"),
            ("Space/1-9", "Pick"),
            ("Enter", "Stack"),
            ("r", "Clear"),
            ("n", "Skip"),
            ("t", "Theme"),
            ("Esc", "Back"),
        ],
        2,
        19,
    )
}

fn render_reveal_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let (Some(round), Some(reveal)) = (&app.round, &app.reveal) else {
        return Ok(());
    };

    let x = centered(term_width, GRID_WIDTH * 2 + 3);
    print_at(stdout, x, 3, theme.info, "Target")?;
    render_grid(stdout, theme, &round.puzzle().target, x, 4, theme.border)?;

    let stack_x = x + CANDIDATE_STRIDE;
    match reveal.current() {
        RevealStep::Layer { layer, grid } => {
            print_at(
                stdout,
                stack_x,
                3,
                theme.info,
                &format!("Layer {}/{}", layer, round.selected().len()),
            )?;
            render_grid(stdout, theme, grid, stack_x, 4, theme.border)?;
        }
        RevealStep::Final { grid, verdict } => {
            let color = verdict_color(theme, verdict);
            print_at(stdout, stack_x, 3, color, "Stacked")?;
            render_grid(stdout, theme, grid, stack_x, 4, color)?;
            print_at(stdout, x, 10, color, verdict.message())?;
        }
    }

    let progress = (reveal.progress() * 20.0) as usize;
    let bar = format!("{}{}", "█".repeat(progress), "░".repeat(20 - progress.min(20)));
    print_at(stdout, x, 12, theme.info, &bar)?;

    let controls: &[(&str, &str)] = if !reveal.is_finished() {
        &[("any key", "Skip")]
    } else if reveal.verdict().is_solved() {
        &[("Enter", "Next puzzle"), ("Esc", "Difficulty")]
    } else {
        &[("any key", "Try again")]
    };
    render_controls(stdout, theme, controls, x, 14)
}

fn verdict_color(theme: &Theme, verdict: &Verdict) -> Color {
    if verdict.is_solved() {
        theme.success
    } else {
        theme.error
    }
}

fn render_exhausted_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let x = centered(term_width, 50);
    print_at(
        stdout,
        x,
        4,
        theme.success,
        &format!("You've played every {} puzzle!", app.difficulty),
    )?;
    print_at(
        stdout,
        x,
        6,
        theme.info,
        "Try another difficulty, or check back for new puzzles.",
    )?;

    if app.session.player().is_guest() {
        render_controls(
            stdout,
            theme,
            &[("r", "Replay from the start"), ("Enter", "Difficulty")],
            x,
            9,
        )
    } else {
        render_controls(stdout, theme, &[("Enter", "Difficulty")], x, 9)
    }
}

fn render_tutorial_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    render_header(stdout, app, term_width)?;

    let Some(demo) = &app.demo else {
        print_at(stdout, 2, 3, theme.error, "No tutorial puzzle available")?;
        return Ok(());
    };

    print_at(stdout, 2, 2, theme.fg, "How to play")?;
    print_at(stdout, 2, 4, theme.info, "Target")?;
    render_grid(stdout, theme, &demo.puzzle().target, 2, 5, theme.border)?;

    let stack_x = 2 + CANDIDATE_STRIDE;
    print_at(stdout, stack_x, 4, theme.info, "Stack")?;
    match demo.reveal() {
        Some(reveal) => {
            let frame = match reveal.current() {
                RevealStep::Final { verdict, .. } => verdict_color(theme, verdict),
                RevealStep::Layer { .. } => theme.border,
            };
            render_grid(stdout, theme, reveal.current().grid(), stack_x, 5, frame)?;
        }
        None => {
            let grids = demo.puzzle().grids_at(demo.selected());
            let stacked = tristack_core::overlay_grids(&grids);
            render_grid(stdout, theme, &stacked, stack_x, 5, theme.border)?;
        }
    }

    print_at(stdout, 2, 11, theme.key, demo.caption())?;

    let grids = &demo.puzzle().available_grids;
    let x = centered(term_width, candidates_width(grids.len())).max(2);
    render_candidates(stdout, theme, grids, demo.selected(), demo.cursor(), x, 13)?;

    render_controls(stdout, theme, &[("p", "Play"), ("Esc", "Back")], 2, 20)
}

fn render_confetti(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    for p in app.confetti.visible(term_width, term_height) {
        execute!(
            stdout,
            MoveTo(p.x as u16, p.y as u16),
            SetForegroundColor(p.color),
            Print(p.char)
        )?;
    }
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    theme: &Theme,
    msg: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let x = centered(term_width, msg.chars().count() as u16 + 4);
    let y = term_height.saturating_sub(2);
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print(format!("[ {} ]", msg))
    )
}
