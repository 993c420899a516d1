use crate::config::Settings;
use crate::model::{Attribute, Face, Pet, RandomEvent, Scene, ATTR_MAX, NAME_MAX};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

/// Marks the right half of a double-width glyph.
const WIDE_TAIL: char = '\0';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c.ch == WIDE_TAIL || (diff_only && c == self.prev.cells[i]) {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text primitives
------------------------------ */

/// Writes `s` starting at column `x`, giving double-width glyphs two cells.
/// Returns the column after the last glyph.
pub(crate) fn draw_text(
    buf: &mut CellBuffer,
    x: u16,
    y: u16,
    s: &str,
    fg: Color,
    bg: Color,
) -> u16 {
    let mut xx = x;
    for ch in s.chars() {
        let width = ch.width().unwrap_or(0) as u16;
        if width == 0 {
            continue;
        }
        if xx.saturating_add(width) > buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
        if width == 2 {
            buf.set(
                xx + 1,
                y,
                Cell {
                    ch: WIDE_TAIL,
                    fg,
                    bg,
                },
            );
        }
        xx += width;
    }
    xx
}

pub(crate) fn bar(value: u32, width: usize) -> String {
    let v = value.min(ATTR_MAX) as usize;
    let fill = (v * width + ATTR_MAX as usize / 2) / ATTR_MAX as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn level_color(value: u32, enable_color: bool) -> Color {
    if !enable_color {
        return Color::White;
    }
    match value {
        0..=29 => Color::Red,
        30..=70 => Color::Yellow,
        _ => Color::Green,
    }
}

fn face_color(face: Face, enable_color: bool) -> Color {
    if !enable_color {
        return Color::White;
    }
    match face {
        Face::Dead => Color::DarkGrey,
        Face::Dark => Color::Magenta,
        Face::Sad => Color::Blue,
        Face::Happy => Color::Green,
        Face::Cool => Color::Cyan,
        Face::Neutral => Color::White,
    }
}

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let fg = Color::White;
    let bg = Color::Black;

    let bw = buf.w.saturating_sub(4).min(50);
    let bh = buf.h.saturating_sub(4).min(9);
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (buf.w - bw) / 2;
    let y0 = (buf.h - bh) / 2;
    let mut put = |x, y, ch| buf.set(x, y, Cell { ch, fg, bg });

    for x in x0..x0 + bw {
        put(x, y0, '─');
        put(x, y0 + bh - 1, '─');
    }
    for y in y0..y0 + bh {
        put(x0, y, '│');
        put(x0 + bw - 1, y, '│');
    }
    put(x0, y0, '┌');
    put(x0 + bw - 1, y0, '┐');
    put(x0, y0 + bh - 1, '└');
    put(x0 + bw - 1, y0 + bh - 1, '┘');

    draw_text(buf, x0 + 2, y0 + 1, title, fg, bg);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, fg, bg);
        yy += 1;
    }
}

/* -----------------------------
   Screens
------------------------------ */

pub(crate) struct View<'a> {
    pub(crate) scene: Scene,
    pub(crate) pet: Option<&'a Pet>,
    pub(crate) name_edit: &'a str,
    pub(crate) last_event: Option<&'static RandomEvent>,
}

pub(crate) fn draw_view(buf: &mut CellBuffer, view: &View<'_>, settings: &Settings) {
    let bg = Color::Black;
    buf.clear(bg);

    match (view.scene, view.pet) {
        (Scene::Main | Scene::Dead, Some(pet)) => {
            draw_pet_panel(buf, pet, view.last_event, settings)
        }
        _ => draw_prompt(buf, view.name_edit),
    }

    let help = match view.scene {
        Scene::Prompt => "Prompt: type a name | enter confirm | esc quit",
        Scene::Main => "Keys: f feed | p play | n nap | t time passes | q quit",
        Scene::Dead => "Game over: r new pet | q quit",
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, Color::White, bg);
}

fn draw_prompt(buf: &mut CellBuffer, name_edit: &str) {
    let mut preview = name_edit.to_string();
    if preview.chars().count() < NAME_MAX {
        preview.push('_');
    }
    draw_center_box(
        buf,
        "Name your pet",
        &format!("Up to {NAME_MAX} characters.\n\nName: {preview}"),
    );
}

fn draw_pet_panel(
    buf: &mut CellBuffer,
    pet: &Pet,
    last_event: Option<&RandomEvent>,
    settings: &Settings,
) {
    let bg = Color::Black;
    let fg = Color::White;
    let color = settings.enable_color;

    draw_text(buf, 1, 0, &format!("PocketPet  |  {}", pet.name), fg, bg);

    let face = pet.face();
    draw_text(buf, 3, 2, face.glyph(), face_color(face, color), bg);

    for (i, attr) in Attribute::ALL.iter().enumerate() {
        let v = attr.get(pet);
        let y = 4 + i as u16;
        let x = draw_text(buf, 1, y, &format!("{:<10}", attr.label()), fg, bg);
        let x = draw_text(buf, x, y, &bar(v, 20), level_color(v, color), bg);
        draw_text(buf, x + 1, y, &format!("{v}/{ATTR_MAX}"), fg, bg);
    }
    draw_text(buf, 1, 8, &format!("Age: {}", pet.age), fg, bg);

    if let Some(ev) = last_event {
        let info = if color { Color::Cyan } else { fg };
        draw_text(
            buf,
            1,
            10,
            &format!("Random event: {} {}", ev.label, ev.emoji),
            info,
            bg,
        );
    }

    if !pet.alive {
        let err = if color { Color::Red } else { fg };
        draw_text(
            buf,
            1,
            12,
            &format!("{} has passed away. 💀 Game over.", pet.name),
            err,
            bg,
        );
    }
}
