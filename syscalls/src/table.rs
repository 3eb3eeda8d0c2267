use std::fmt;

use derive_more::{Display, From, Into};
use typed_index_collections::TiVec;

/// Index into the kernel's system call table.
#[derive(From, Into, Display, Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SyscallNumber(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Syscall {
    pub name: &'static str,
    pub argc: u8,
}

/// The result of looking a number up. Numbers past the end of the table are
/// reported rather than clamped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lookup {
    Known(Syscall),
    Unknown(SyscallNumber),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Known(call) => write!(f, "<Syscall {}/{}>", call.name, call.argc),
            Lookup::Unknown(number) => write!(f, "<Syscall unknown #{number}>"),
        }
    }
}

pub struct SyscallTable {
    calls: TiVec<SyscallNumber, Syscall>,
}

impl SyscallTable {
    pub fn new(calls: impl IntoIterator<Item = Syscall>) -> Self {
        Self {
            calls: calls.into_iter().collect(),
        }
    }

    /// The AT&T 3B2 System V Release 3 `sysent` table.
    pub fn svr3() -> Self {
        Self::new(
            SVR3
                .iter()
                .map(|&(name, argc)| Syscall { name, argc }),
        )
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn lookup(&self, number: SyscallNumber) -> Lookup {
        match self.calls.get(number) {
            Some(call) => Lookup::Known(*call),
            None => Lookup::Unknown(number),
        }
    }
}

const SVR3: [(&str, u8); 88] = [
    ("nosys", 0),
    ("rexit", 1),
    ("fork", 0),
    ("read", 3),
    ("write", 3),
    ("open", 3),
    ("close", 1),
    ("wait", 0),
    ("creat", 2),
    ("link", 2),
    ("unlink", 1),
    ("exec", 2),
    ("chdir", 1),
    ("gtime", 0),
    ("mknod", 3),
    ("chmod", 2),
    ("chown", 3),
    ("sbreak", 1),
    ("stat", 2),
    ("seek", 3),
    ("getpid", 0),
    ("smount", 3),
    ("sumount", 1),
    ("setuid", 1),
    ("getuid", 0),
    ("stime", 1),
    ("ptrace", 4),
    ("alarm", 1),
    ("fstat", 2),
    ("pause", 0),
    ("utime", 2),
    ("stty", 2),
    ("gtty", 2),
    ("saccess", 2),
    ("nice", 1),
    ("statfs", 4),
    ("sync", 0),
    ("kill", 2),
    ("fstatfs", 4),
    ("setpgrp", 1),
    ("nosys", 0),
    ("dup", 1),
    ("pipe", 0),
    ("times", 1),
    ("profil", 4),
    ("lock", 1),
    ("setgid", 1),
    ("getgid", 0),
    ("ssig", 2),
    ("msgsys", 6),
    ("sys3b", 3),
    ("sysacct", 1),
    ("shmsys", 4),
    ("semsys", 5),
    ("ioctl", 3),
    ("uadmin", 3),
    ("nosys", 0),
    ("utssys", 3),
    ("nosys", 0),
    ("exece", 3),
    ("umask", 1),
    ("chroot", 1),
    ("fcntl", 3),
    ("ulimit", 2),
    ("nosys", 0),
    ("nosys", 0),
    ("nosys", 0),
    ("nosys", 0),
    ("nosys", 0),
    ("nosys", 0),
    ("advfs", 4),
    ("unadvfs", 1),
    ("rmount", 4),
    ("rumount", 1),
    ("rfstart", 0),
    ("nosys", 0),
    ("rdebug", 1),
    ("rfstop", 0),
    ("rfsys", 5),
    ("rmdir", 1),
    ("mkdir", 2),
    ("getdents", 3),
    ("libattach", 2),
    ("libdetach", 1),
    ("sysfs", 3),
    ("getmsg", 4),
    ("putmsg", 4),
    ("poll", 3),
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = SyscallTable::svr3();
        assert_eq!(table.len(), 88);
        assert_eq!(
            table.lookup(SyscallNumber(4)),
            Lookup::Known(Syscall {
                name: "write",
                argc: 3
            })
        );
        assert_eq!(table.lookup(SyscallNumber(87)).to_string(), "<Syscall poll/3>");
    }

    #[test]
    fn test_out_of_range() {
        let table = SyscallTable::svr3();
        assert_eq!(
            table.lookup(SyscallNumber(88)),
            Lookup::Unknown(SyscallNumber(88))
        );
        assert_eq!(
            table.lookup(SyscallNumber(1000)).to_string(),
            "<Syscall unknown #1000>"
        );
        assert!(matches!(
            SyscallTable::new([]).lookup(SyscallNumber(0)),
            Lookup::Unknown(_)
        ));
    }
}
