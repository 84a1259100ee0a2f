//! Pre-built mock filesystem scenarios for testing.
//!
//! These scenarios provide realistic `/proc` filesystem states
//! for testing various system conditions.

use super::filesystem::MockFs;

impl MockFs {
    /// Creates a typical system with a few processes.
    ///
    /// Includes: init (PID 1), bash shell, and a cat command run from it.
    /// Four cores, 12345.67 s of uptime.
    pub fn typical_system() -> Self {
        let fs = Self::new();

        // /etc/passwd for user name resolution
        fs.add_file(
            "/etc/passwd",
            "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
bin:x:2:2:bin:/bin:/usr/sbin/nologin
sys:x:3:3:sys:/dev:/usr/sbin/nologin
nobody:x:65534:65534:nobody:/nonexistent:/usr/sbin/nologin
user:x:1000:1000:User:/home/user:/bin/bash
",
        );
        fs.add_file(
            "/etc/os-release",
            "\
PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"
NAME=\"Debian GNU/Linux\"
VERSION_ID=\"12\"
ID=debian
",
        );

        // System-wide files
        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file(
            "/proc/version",
            "Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) (gcc-12 (Debian 12.2.0-14) 12.2.0, GNU ld (GNU Binutils for Debian) 2.40) #1 SMP PREEMPT_DYNAMIC Debian 6.1.76-1 (2024-02-01)\n",
        );
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
",
        );
        fs.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        // PID 1 - init/systemd
        fs.add_process(
            1,
            "1 (systemd) S 0 1 1 0 -1 4194560 50000 1000000 100 500 1000 500 2000 1000 20 0 1 0 1 170000000 3000 18446744073709551615 0 0 0 0 0 0 0 0 1073745152 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "\
Name:\tsystemd
Pid:\t1
PPid:\t0
Uid:\t0\t0\t0\t0
Gid:\t0\t0\t0\t0
VmPeak:\t  200000 kB
VmSize:\t  170000 kB
VmRSS:\t   12000 kB
VmData:\t   10000 kB
Threads:\t1
voluntary_ctxt_switches:\t1000
nonvoluntary_ctxt_switches:\t100
",
            "/sbin/init\0",
        );

        // PID 1000 - bash shell
        fs.add_process(
            1000,
            "1000 (bash) S 999 1000 1000 34816 1001 4194304 5000 50000 0 0 100 50 200 100 20 0 1 0 100000 25000000 2000 18446744073709551615 0 0 0 0 0 0 65536 3670020 1266777851 0 0 0 17 2 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "\
Name:\tbash
Pid:\t1000
PPid:\t999
Uid:\t1000\t1000\t1000\t1000
Gid:\t1000\t1000\t1000\t1000
VmPeak:\t   30000 kB
VmSize:\t   25000 kB
VmRSS:\t    8000 kB
VmData:\t    2000 kB
Threads:\t1
voluntary_ctxt_switches:\t500
nonvoluntary_ctxt_switches:\t50
",
            "/bin/bash\0--login\0",
        );

        // PID 1001 - cat command (child of bash)
        fs.add_process(
            1001,
            "1001 (cat) R 1000 1000 1000 34816 1001 4194304 100 0 0 0 5 2 0 0 20 0 1 0 100100 5000000 500 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "\
Name:\tcat
Pid:\t1001
PPid:\t1000
Uid:\t1000\t1000\t1000\t1000
Gid:\t1000\t1000\t1000\t1000
VmPeak:\t    6000 kB
VmSize:\t    5000 kB
VmRSS:\t    2000 kB
VmData:\t     200 kB
Threads:\t1
voluntary_ctxt_switches:\t10
nonvoluntary_ctxt_switches:\t2
",
            "/bin/cat\0file.txt\0",
        );

        fs
    }

    /// Creates a system under high CPU load.
    ///
    /// Adds a multi-threaded `stress` process owned by an account missing
    /// from `/etc/passwd`.
    pub fn busy_system() -> Self {
        let fs = Self::typical_system();

        fs.add_file(
            "/proc/stat",
            "\
cpu  500000 1000 100000 50000 500 1000 500 0 0 0
cpu0 125000 250 25000 12500 125 250 125 0 0 0
cpu1 125000 250 25000 12500 125 250 125 0 0 0
cpu2 125000 250 25000 12500 125 250 125 0 0 0
cpu3 125000 250 25000 12500 125 250 125 0 0 0
ctxt 5000000
btime 1700000000
processes 50000
procs_running 5
procs_blocked 0
",
        );

        fs.add_process(
            2000,
            "2000 (stress) R 1000 2000 1000 34816 2000 4194304 1000 0 0 0 200000 1000 0 0 20 0 4 0 200000 10000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0 0 0 0 0 0 0 0 0",
            "\
Name:\tstress
Pid:\t2000
PPid:\t1000
Uid:\t1500\t1500\t1500\t1500
Gid:\t1500\t1500\t1500\t1500
VmPeak:\t   10000 kB
VmSize:\t   10000 kB
VmRSS:\t    1048576 kB
VmData:\t    1000 kB
Threads:\t4
",
            "/usr/bin/stress\0--cpu\x004\0",
        );

        fs
    }

    /// Creates a bare single-core system with no processes and no `/etc` files.
    pub fn minimal_system() -> Self {
        let fs = Self::new();

        fs.add_file("/proc/uptime", "60.00 55.00\n");
        fs.add_file(
            "/proc/meminfo",
            "MemTotal:  2048000 kB\nMemFree:  512000 kB\nMemAvailable:  1024000 kB\nBuffers:  0 kB\n",
        );
        fs.add_file(
            "/proc/stat",
            "cpu  100 0 100 800\ncpu0 100 0 100 800\nprocesses 10\nprocs_running 1\n",
        );

        fs
    }
}
