use crate::error::{InputError, Result};
use crate::math::Point2;

/// A path-data command with every coordinate resolved to absolute form.
///
/// Relative commands, horizontal/vertical line-tos and smooth curve shorthands
/// are expanded by [`parse_path_data`], so consumers only see these variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    QuadTo {
        ctrl: Point2,
        to: Point2,
    },
    CubicTo {
        ctrl1: Point2,
        ctrl2: Point2,
        to: Point2,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        to: Point2,
    },
    Close,
}

/// Parses a path-data string (`M 0 0 L 10 0 ... Z`) into absolute commands.
///
/// Accepts the full command set `MLHVCSQTAZ` in both cases, implicit command
/// repetition and compact number syntax such as `1.5.5` or `10-5`.
///
/// # Errors
///
/// Returns [`InputError::MalformedPath`] if the string does not start with a
/// move-to, contains an unknown command, or is missing arguments.
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>> {
    PathParser::new(data).parse()
}

struct PathParser<'a> {
    src: &'a [u8],
    pos: usize,
    current: Point2,
    subpath_start: Point2,
    prev_cubic_ctrl: Option<Point2>,
    prev_quad_ctrl: Option<Point2>,
    commands: Vec<PathCommand>,
}

impl<'a> PathParser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            src: data.as_bytes(),
            pos: 0,
            current: Point2::origin(),
            subpath_start: Point2::origin(),
            prev_cubic_ctrl: None,
            prev_quad_ctrl: None,
            commands: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<PathCommand>> {
        let mut previous: Option<u8> = None;
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                break;
            };

            let command = if b.is_ascii_alphabetic() {
                self.pos += 1;
                b
            } else {
                match previous {
                    Some(b'Z' | b'z') | None => {
                        return Err(self.error(format!("expected command, found '{}'", b as char)));
                    }
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(prev) => prev,
                }
            };

            if previous.is_none() && !matches!(command, b'M' | b'm') {
                return Err(self.error("path data must start with a move-to".to_owned()));
            }

            self.apply(command)?;
            previous = Some(command);
        }
        Ok(self.commands)
    }

    #[allow(clippy::too_many_lines)]
    fn apply(&mut self, command: u8) -> Result<()> {
        let relative = command.is_ascii_lowercase();
        let origin = if relative { self.current.coords } else { Point2::origin().coords };
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match command.to_ascii_uppercase() {
            b'M' => {
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::MoveTo(to));
                self.current = to;
                self.subpath_start = to;
            }
            b'L' => {
                let to = Point2::from(self.point()?.coords + origin);
                self.line_to(to);
            }
            b'H' => {
                let x = self.number()?;
                let to = Point2::new(if relative { self.current.x + x } else { x }, self.current.y);
                self.line_to(to);
            }
            b'V' => {
                let y = self.number()?;
                let to = Point2::new(self.current.x, if relative { self.current.y + y } else { y });
                self.line_to(to);
            }
            b'C' => {
                let ctrl1 = Point2::from(self.point()?.coords + origin);
                let ctrl2 = Point2::from(self.point()?.coords + origin);
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
                self.current = to;
                cubic_ctrl = Some(ctrl2);
            }
            b'S' => {
                let ctrl1 = reflect(self.prev_cubic_ctrl, self.current);
                let ctrl2 = Point2::from(self.point()?.coords + origin);
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
                self.current = to;
                cubic_ctrl = Some(ctrl2);
            }
            b'Q' => {
                let ctrl = Point2::from(self.point()?.coords + origin);
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::QuadTo { ctrl, to });
                self.current = to;
                quad_ctrl = Some(ctrl);
            }
            b'T' => {
                let ctrl = reflect(self.prev_quad_ctrl, self.current);
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::QuadTo { ctrl, to });
                self.current = to;
                quad_ctrl = Some(ctrl);
            }
            b'A' => {
                let rx = self.number()?;
                let ry = self.number()?;
                let rotation_deg = self.number()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let to = Point2::from(self.point()?.coords + origin);
                self.commands.push(PathCommand::ArcTo {
                    rx,
                    ry,
                    rotation_deg,
                    large_arc,
                    sweep,
                    to,
                });
                self.current = to;
            }
            b'Z' => {
                self.commands.push(PathCommand::Close);
                self.current = self.subpath_start;
            }
            _ => {
                self.pos -= 1;
                return Err(self.error(format!("unknown command '{}'", command as char)));
            }
        }

        self.prev_cubic_ctrl = cubic_ctrl;
        self.prev_quad_ctrl = quad_ctrl;
        Ok(())
    }

    fn line_to(&mut self, to: Point2) {
        self.commands.push(PathCommand::LineTo(to));
        self.current = to;
    }

    fn point(&mut self) -> Result<Point2> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point2::new(x, y))
    }

    fn number(&mut self) -> Result<f64> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let int_digits = self.eat_digits();
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac_digits = self.eat_digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return Err(self.error("expected number".to_owned()));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let exp_start = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.eat_digits() == 0 {
                self.pos = exp_start;
            }
        }

        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error_at(start, "invalid number encoding".to_owned()))?;
        text.parse::<f64>()
            .map_err(|e| self.error_at(start, format!("invalid number '{text}': {e}")))
    }

    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag '0' or '1'".to_owned())),
        }
    }

    fn eat_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn error(&self, message: String) -> crate::error::SignError {
        self.error_at(self.pos, message)
    }

    #[allow(clippy::unused_self)]
    fn error_at(&self, position: usize, message: String) -> crate::error::SignError {
        InputError::MalformedPath { position, message }.into()
    }
}

/// Reflects the previous control point about the current point, or returns
/// the current point when the previous command was not a matching curve.
fn reflect(prev_ctrl: Option<Point2>, current: Point2) -> Point2 {
    match prev_ctrl {
        Some(ctrl) => Point2::from(current.coords * 2.0 - ctrl.coords),
        None => current,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SignError;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn parses_absolute_square() {
        let cmds = parse_path_data("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(p(0.0, 0.0)),
                PathCommand::LineTo(p(10.0, 0.0)),
                PathCommand::LineTo(p(10.0, 10.0)),
                PathCommand::LineTo(p(0.0, 10.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn relative_and_implicit_line_tos() {
        let cmds = parse_path_data("m1 1 2 0 0 2h-2z").unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(p(1.0, 1.0)),
                PathCommand::LineTo(p(3.0, 1.0)),
                PathCommand::LineTo(p(3.0, 3.0)),
                PathCommand::LineTo(p(1.0, 3.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn compact_numbers() {
        let cmds = parse_path_data("M.5.5L10-5,1e1 2E-1").unwrap();
        assert_eq!(cmds[0], PathCommand::MoveTo(p(0.5, 0.5)));
        assert_eq!(cmds[1], PathCommand::LineTo(p(10.0, -5.0)));
        assert_eq!(cmds[2], PathCommand::LineTo(p(10.0, 0.2)));
    }

    #[test]
    fn smooth_cubic_reflects_control_point() {
        let cmds = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        let PathCommand::CubicTo { ctrl1, .. } = cmds[2] else {
            panic!("expected cubic, got {:?}", cmds[2]);
        };
        assert_eq!(ctrl1, p(10.0, -10.0));
    }

    #[test]
    fn smooth_quad_without_previous_quad_uses_current_point() {
        let cmds = parse_path_data("M0 0 L5 5 T10 0").unwrap();
        let PathCommand::QuadTo { ctrl, .. } = cmds[2] else {
            panic!("expected quad, got {:?}", cmds[2]);
        };
        assert_eq!(ctrl, p(5.0, 5.0));
    }

    #[test]
    fn compact_arc_flags() {
        let cmds = parse_path_data("M0 0a5 5 0 1110 0").unwrap();
        assert_eq!(
            cmds[1],
            PathCommand::ArcTo {
                rx: 5.0,
                ry: 5.0,
                rotation_deg: 0.0,
                large_arc: true,
                sweep: true,
                to: p(10.0, 0.0),
            }
        );
    }

    #[test]
    fn close_resets_current_point() {
        let cmds = parse_path_data("M5 5 l5 0 l0 5 z l1 1").unwrap();
        assert_eq!(cmds.last(), Some(&PathCommand::LineTo(p(6.0, 6.0))));
    }

    #[test]
    fn empty_string_has_no_commands() {
        assert!(parse_path_data("   ").unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_moveto() {
        let err = parse_path_data("L10 10").unwrap_err();
        assert!(matches!(
            err,
            SignError::Input(InputError::MalformedPath { .. })
        ));
    }

    #[test]
    fn rejects_unknown_command() {
        let err = parse_path_data("M0 0 X10 10").unwrap_err();
        let SignError::Input(InputError::MalformedPath { position, .. }) = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(position, 5);
    }

    #[test]
    fn rejects_truncated_arguments() {
        assert!(parse_path_data("M0 0 L10").is_err());
        assert!(parse_path_data("M0 0 C1 1 2 2").is_err());
        assert!(parse_path_data("M0 0 Z 5").is_err());
    }
}
