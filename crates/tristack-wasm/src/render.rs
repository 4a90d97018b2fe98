//! Canvas rendering for the browser UI

use crate::game::{GameState, ScreenState, TITLE_MENU};
use crate::theme::{Color, Theme};
use tristack_core::{Difficulty, Grid, RevealStep, GRID_SIZE, SELECTION_SIZE};
use web_sys::CanvasRenderingContext2d;

/// Sizes derived from the canvas
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Edge of one cell of a large grid
    pub cell: f64,
    pub font_size: f64,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let cell = (height as f64 / 16.0).clamp(18.0, 48.0);
        Self {
            width: width as f64,
            height: height as f64,
            cell,
            font_size: (cell * 0.45).max(12.0),
        }
    }

    fn small_cell(&self) -> f64 {
        self.cell * 0.6
    }
}

/// Render the complete game to canvas
pub fn render_game(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    layout: &Layout,
) {
    ctx.set_fill_style_str(&theme.background.as_css());
    ctx.fill_rect(0.0, 0.0, layout.width, layout.height);
    ctx.set_font(&format!("{}px monospace", layout.font_size));
    ctx.set_text_baseline("top");

    render_header(ctx, state, theme, layout);

    match state.screen() {
        ScreenState::Title => render_title(ctx, state, theme, layout),
        ScreenState::DifficultySelect => render_difficulty(ctx, state, theme, layout),
        ScreenState::Playing | ScreenState::Reveal => render_board(ctx, state, theme, layout),
        ScreenState::Exhausted => render_exhausted(ctx, state, theme, layout),
        ScreenState::Tutorial => render_tutorial(ctx, state, theme, layout),
    }

    if let Some(msg) = state.message() {
        text(
            ctx,
            msg,
            20.0,
            layout.height - layout.font_size * 2.0,
            theme.message_text,
        );
    }
}

fn text(ctx: &CanvasRenderingContext2d, s: &str, x: f64, y: f64, color: Color) {
    ctx.set_fill_style_str(&color.as_css());
    let _ = ctx.fill_text(s, x, y);
}

/// Draw a grid with cell edge `cell` and a colored frame
fn render_grid(
    ctx: &CanvasRenderingContext2d,
    theme: &Theme,
    grid: &Grid,
    x: f64,
    y: f64,
    cell: f64,
    frame: Color,
) {
    let gap = (cell * 0.08).max(1.0);
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            ctx.set_fill_style_str(&theme.cell(*value).as_css());
            ctx.fill_rect(
                x + c as f64 * cell + gap,
                y + r as f64 * cell + gap,
                cell - gap * 2.0,
                cell - gap * 2.0,
            );
        }
    }

    let size = cell * GRID_SIZE as f64;
    ctx.set_stroke_style_str(&frame.as_css());
    ctx.set_line_width(2.0);
    ctx.stroke_rect(x - 2.0, y - 2.0, size + 4.0, size + 4.0);
}

fn render_header(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    layout: &Layout,
) {
    text(ctx, "TRISTACK", 20.0, 12.0, theme.message_text);
    let player = format!("Player: {}", state.session().player().display_name());
    let x = layout.width - 20.0 - player.len() as f64 * layout.font_size * 0.6;
    text(ctx, &player, x, 12.0, theme.info_text);
}

fn render_menu(
    ctx: &CanvasRenderingContext2d,
    theme: &Theme,
    layout: &Layout,
    items: &[String],
    selection: usize,
    x: f64,
    y: f64,
) {
    let line = layout.font_size * 1.6;
    for (i, item) in items.iter().enumerate() {
        let (label, color) = if i == selection {
            (format!("> {}", item), theme.cursor)
        } else {
            (format!("  {}", item), theme.text)
        };
        text(ctx, &label, x, y + i as f64 * line, color);
    }
}

fn render_title(ctx: &CanvasRenderingContext2d, state: &GameState, theme: &Theme, layout: &Layout) {
    let x = 40.0;
    let y = layout.cell * 2.0;
    text(
        ctx,
        "Stack three grids to rebuild the target.",
        x,
        y,
        theme.info_text,
    );
    let items: Vec<String> = TITLE_MENU.iter().map(|s| s.to_string()).collect();
    render_menu(ctx, theme, layout, &items, state.menu_selection(), x, y + layout.cell);

    if let Some(demo) = state.demo() {
        let dx = layout.width / 2.0;
        render_grid(ctx, theme, &demo.puzzle().target, dx, y, layout.cell, theme.frame);
        let stacked = demo
            .reveal()
            .map(|r| *r.current().grid())
            .unwrap_or_else(|| tristack_core::overlay_grids(&demo.puzzle().grids_at(demo.selected())));
        let sx = dx + layout.cell * 4.0;
        render_grid(ctx, theme, &stacked, sx, y, layout.cell, theme.frame);
        text(ctx, demo.caption(), dx, y + layout.cell * 3.5, theme.text);
    }
}

fn render_difficulty(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    layout: &Layout,
) {
    let x = 40.0;
    let y = layout.cell * 2.0;
    text(ctx, "Choose a difficulty", x, y, theme.text);
    let items: Vec<String> = Difficulty::all()
        .iter()
        .map(|d| format!("{:<8} {}", d.to_string(), d.blurb()))
        .collect();
    render_menu(ctx, theme, layout, &items, state.menu_selection(), x, y + layout.cell);
}

fn render_candidates(
    ctx: &CanvasRenderingContext2d,
    theme: &Theme,
    layout: &Layout,
    grids: &[Grid],
    selected: &[usize],
    cursor: Option<usize>,
    y: f64,
) {
    let cell = layout.small_cell();
    let stride = cell * (GRID_SIZE as f64 + 1.0);
    let total = stride * grids.len() as f64 - cell;
    let x0 = ((layout.width - total) / 2.0).max(20.0);

    for (i, grid) in grids.iter().enumerate() {
        let x = x0 + i as f64 * stride;
        let frame = if cursor == Some(i) {
            theme.cursor
        } else if selected.contains(&i) {
            theme.selected
        } else {
            theme.frame
        };
        render_grid(ctx, theme, grid, x, y, cell, frame);

        let label = match selected.iter().position(|&s| s == i) {
            Some(order) => format!("{} #{}", i + 1, order + 1),
            None => format!("{}", i + 1),
        };
        let color = if selected.contains(&i) {
            theme.selected
        } else {
            theme.info_text
        };
        text(ctx, &label, x, y + cell * GRID_SIZE as f64 + 6.0, color);
    }
}

fn render_board(ctx: &CanvasRenderingContext2d, state: &GameState, theme: &Theme, layout: &Layout) {
    let Some(round) = state.round() else {
        return;
    };
    let puzzle = round.puzzle();
    let x = 40.0;
    let y = layout.cell * 2.0;

    text(
        ctx,
        &format!("{} puzzle {}", puzzle.difficulty, puzzle.id),
        x,
        y - layout.font_size * 1.8,
        theme.info_text,
    );
    render_grid(ctx, theme, &puzzle.target, x, y, layout.cell, theme.frame);

    let sx = x + layout.cell * 4.0;
    match state.reveal().map(|r| *r.current()) {
        Some(RevealStep::Layer { layer, grid }) => {
            render_grid(ctx, theme, &grid, sx, y, layout.cell, theme.frame);
            text(
                ctx,
                &format!("Layer {}/{}", layer, round.selected().len()),
                sx + layout.cell * 4.0,
                y,
                theme.info_text,
            );
        }
        Some(RevealStep::Final { grid, verdict }) => {
            let color = if verdict.is_solved() {
                theme.success
            } else {
                theme.error
            };
            render_grid(ctx, theme, &grid, sx, y, layout.cell, color);
            text(ctx, verdict.message(), sx + layout.cell * 4.0, y, color);
        }
        None => {
            render_grid(ctx, theme, &round.preview(), sx, y, layout.cell, theme.frame);
            text(
                ctx,
                &format!("Stack {}/{}", round.selected().len(), SELECTION_SIZE),
                sx + layout.cell * 4.0,
                y,
                theme.info_text,
            );
        }
    }
    text(
        ctx,
        &format!("Attempts: {}", round.attempts()),
        sx + layout.cell * 4.0,
        y + layout.font_size * 1.6,
        theme.info_text,
    );

    render_candidates(
        ctx,
        theme,
        layout,
        &puzzle.available_grids,
        round.selected(),
        Some(state.cursor()),
        y + layout.cell * 4.5,
    );
}

fn render_exhausted(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    layout: &Layout,
) {
    let x = 40.0;
    let y = layout.cell * 2.0;
    text(
        ctx,
        &format!("You've played every {} puzzle!", state.difficulty()),
        x,
        y,
        theme.success,
    );
    let hint = if state.session().player().is_guest() {
        "Press r to replay from the start, or Enter to pick another difficulty."
    } else {
        "Press Enter to pick another difficulty."
    };
    text(ctx, hint, x, y + layout.font_size * 2.0, theme.info_text);
}

fn render_tutorial(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    theme: &Theme,
    layout: &Layout,
) {
    let Some(demo) = state.demo() else {
        text(ctx, "No tutorial puzzle available", 40.0, 60.0, theme.error);
        return;
    };
    let x = 40.0;
    let y = layout.cell * 2.0;
    render_grid(ctx, theme, &demo.puzzle().target, x, y, layout.cell, theme.frame);

    let stacked = demo
        .reveal()
        .map(|r| *r.current().grid())
        .unwrap_or_else(|| tristack_core::overlay_grids(&demo.puzzle().grids_at(demo.selected())));
    render_grid(ctx, theme, &stacked, x + layout.cell * 4.0, y, layout.cell, theme.frame);
    text(ctx, demo.caption(), x, y + layout.cell * 3.5, theme.text);

    render_candidates(
        ctx,
        theme,
        layout,
        &demo.puzzle().available_grids,
        demo.selected(),
        demo.cursor(),
        y + layout.cell * 4.5,
    );
}
