//! Testing methods on chipvm's structs
use chipvm::prelude::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn machine() {
    let machine = Machine::default(); // Default
    let machine2 = machine.clone(); // Clone
    assert_eq!(machine, machine2); // PartialEq
    println!("{machine:?}"); // Debug
}

#[test]
fn press_invalid_key() {
    let mut machine = Machine::default();
    let machine2 = machine.clone();
    assert!(matches!(
        machine.press(0x21345134),
        Err(Error::InvalidKey { key: 0x21345134 })
    ));
    // no change has been made, everything is safe.
    assert_eq!(machine, machine2);
}

#[test]
fn release_invalid_key() {
    let mut machine = Machine::default();
    let machine2 = machine.clone();
    machine
        .release(0x10)
        .expect_err("This should produce an Error::InvalidKey");
    // no change has been made, everything is safe.
    assert_eq!(machine, machine2);
}

#[test]
fn set_invalid_reg() {
    let mut machine = Machine::default();
    let machine2 = machine.clone();
    machine
        .set_v(0x21345134, 0xff)
        .expect_err("This should produce an Error::InvalidRegister");
    // no change has been made
    assert_eq!(machine, machine2);
}

#[test]
fn error() {
    let errors = [
        Error::OutOfBounds { addr: 0x1000 },
        Error::StackOverflow { addr: 0x234 },
        Error::StackUnderflow,
        Error::InvalidKey { key: 0x10 },
        Error::UnsupportedOpcode { word: 0x800f },
        Error::ProgramTooLarge {
            len: 0xe01,
            max: 0xe00,
        },
        Error::InvalidRegister { reg: 0x10 },
    ];
    // Print them with Display and Debug
    for error in &errors {
        println!("{error} {error:?}");
    }
    let out_of_bounds: Vec<bool> = errors.iter().map(Error::is_out_of_bounds).collect();
    assert_eq!(out_of_bounds, [true, true, true, true, false, false, false]);
    assert_eq!(
        Error::UnsupportedOpcode { word: 0x800f }.to_string(),
        "opcode 800f not supported"
    );
}

mod region {
    use super::*;
    //  #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[test]
    fn copy() {
        let r1 = Program;
        let r2 = r1;
        assert_eq!(r1, r2);
    }
    #[test]
    fn debug() {
        println!("{Charset:?}{Program:?}");
    }
    #[test]
    fn ord() {
        assert_eq!(Program, Charset.max(Program));
        assert!(Charset < Program);
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Program.hash(&mut hasher);
        println!("{hasher:?}");
    }
    #[test]
    fn ranges() {
        assert_eq!(Charset.range(), 0x050..0x0a0);
        assert_eq!(Program.range(), 0x200..0x1000);
        assert_eq!(Mem::new().as_slice().len(), Program.range().end);
    }
    #[test]
    fn load_region_fills_from_start() {
        let mut mem = Mem::new();
        mem.load_region(Charset, &[0xaa; 5]).unwrap();
        assert_eq!(&mem.as_slice()[0x050..0x056], &[0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0x20]);
        // reset puts the font back
        mem.reset();
        assert_eq!(&mem.as_slice()[Charset.range()], &chipvm::machine::mem::FONT);
    }
}

mod flags {
    use super::*;
    //#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[test]
    fn clone() {
        let f1 = Flags {
            trace: true,
            keypause: false,
        };
        let f2 = f1.clone();
        assert_eq!(f1, f2)
    }
    #[test]
    fn default() {
        assert_eq!(
            Flags::default(),
            Flags {
                trace: false,
                keypause: false,
            }
        )
    }
    #[test]
    fn ord() {
        let f1 = Flags::default();
        let f2 = Flags {
            trace: true,
            keypause: true,
        };
        assert!(f1 < f2);
        assert_eq!(Flags::default(), f1.min(f2));
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Flags::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod insn {
    use super::*;
    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let insn = Insn::from_word(0xefa1).unwrap(); // random valid opcode
        let clone = insn.clone();
        assert_eq!(insn, clone);
    }
    #[test]
    fn display() {
        let cases = [
            (0x00e0, "cls"),
            (0x00ee, "ret"),
            (0x1234, "jp     234"),
            (0x6a5f, "ld     vA, #5f"),
            (0x8124, "add    v1, v2"),
            (0xd125, "drw    v1, v2, #5"),
        ];
        for (word, text) in cases {
            let insn = Insn::from_word(word).unwrap();
            assert_eq!(insn.to_string().trim_end(), text);
        }
    }
    #[test]
    fn debug() {
        println!("{:?}", Insn::from_word(0x4141)) // "sne v1, #41"
    }
    #[test]
    fn rejects_undocumented() {
        for word in [0x0000, 0x00e1, 0x01ef, 0x800f, 0x8ab9, 0xe19f, 0xf1ff] {
            assert_eq!(Insn::from_word(word), None, "{word:04x} should not decode");
        }
    }
    #[test]
    fn ignores_unused_nibbles() {
        assert_eq!(Insn::from_word(0x01e0), Some(Insn::cls { n: 1 }));
        assert_eq!(Insn::from_word(0x0fee), Some(Insn::ret { n: 0xf }));
        assert_eq!(Insn::from_word(0x5121), Some(Insn::se { y: 2, x: 1, n: 1 }));
        assert_eq!(Insn::from_word(0x9ab1), Some(Insn::sne { y: 0xb, x: 0xa, n: 1 }));
    }
}

mod screen {
    use super::*;
    #[test]
    fn display() {
        let mut screen = Screen::new();
        screen.toggle(0, 0);
        let text = screen.to_string();
        assert_eq!(text.lines().count(), 32);
        assert!(text.starts_with("00|█ "));
    }
    #[test]
    fn default() {
        assert_eq!(Screen::default(), Screen::new());
        assert!(Screen::default().is_blank());
    }
}

mod stack {
    use super::*;
    #[test]
    fn lifo() {
        let mut stack = Stack::default();
        stack.push(0x200, 0x300).unwrap();
        stack.push(0x300, 0x400).unwrap();
        assert_eq!(stack.as_slice(), &[0x200, 0x300]);
        assert_eq!(stack.pop().unwrap(), 0x300);
        assert_eq!(stack.pop().unwrap(), 0x200);
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
    }
}

mod control {
    use super::*;
    #[test]
    fn default() {
        assert_eq!(Control::default(), Control::Run);
    }
}
