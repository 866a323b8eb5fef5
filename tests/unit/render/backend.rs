use super::*;
use crate::command::record::DomainBox;
use crate::foundation::core::BoxI;

#[derive(Default)]
struct RecordingBackend {
    calls: Vec<&'static str>,
    fail_on_fill: bool,
}

impl CommandBackend for RecordingBackend {
    fn exec_state(&mut self, _cmd: &StateCmd) -> PaintResult<()> {
        self.calls.push("state");
        Ok(())
    }

    fn exec_fill(&mut self, _cmd: &FillCmd) -> PaintResult<()> {
        self.calls.push("fill");
        if self.fail_on_fill {
            return Err(crate::foundation::error::PaintError::execution("boom"));
        }
        Ok(())
    }

    fn exec_blit(&mut self, _cmd: &BlitCmd) -> PaintResult<()> {
        self.calls.push("blit");
        Ok(())
    }

    fn exec_filter(&mut self, _cmd: &FilterCmd) -> PaintResult<()> {
        self.calls.push("filter");
        Ok(())
    }

    fn exec_mask(&mut self, _cmd: &MaskCmd) -> PaintResult<()> {
        self.calls.push("mask");
        Ok(())
    }
}

fn sequence() -> Vec<Command> {
    vec![
        Command::State(StateCmd::Opacity(1.0)),
        Command::Mask(MaskCmd::Switch),
        Command::Fill(FillCmd::Box(DomainBox::I(BoxI::new(0, 0, 1, 1)))),
        Command::Filter(FilterCmd::Box {
            filter: crate::command::record::Filter::Invert,
            area: DomainBox::I(BoxI::new(0, 0, 1, 1)),
        }),
    ]
}

#[test]
fn execute_commands_routes_in_order() {
    let mut b = RecordingBackend::default();
    execute_commands(&mut b, &sequence()).unwrap();
    assert_eq!(b.calls, vec!["state", "mask", "fill", "filter"]);
}

#[test]
fn execute_commands_stops_at_first_error() {
    let mut b = RecordingBackend {
        fail_on_fill: true,
        ..RecordingBackend::default()
    };
    assert!(execute_commands(&mut b, &sequence()).is_err());
    assert_eq!(b.calls, vec!["state", "mask", "fill"]);
}
