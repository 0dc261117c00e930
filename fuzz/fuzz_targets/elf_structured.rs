#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use solist_formats::{list_exported_functions_from_bytes, Elf};

/// Structured ELF header for targeted fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzedElf {
    // ELF identification
    ei_class: u8, // 1 = 32-bit, 2 = 64-bit
    ei_data: u8,  // 1 = little endian, 2 = big endian
    ei_osabi: u8,

    // ELF header fields
    e_type: u16,
    e_machine: u16,
    e_shoff: u16, // Kept small so it lands inside the file
    e_shentsize: u16,
    e_shnum: u16,
    e_shstrndx: u16,

    // Variable sections
    sections: Vec<FuzzedSection>,
    extra_data: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct FuzzedSection {
    sh_name: u32,
    sh_type: u32,
    sh_offset: u16,
    sh_size: u16,
    sh_link: u32,
    sh_entsize: u8,
}

impl FuzzedElf {
    fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        let is_64bit = self.ei_class == 2;
        let is_le = self.ei_data != 2;

        // ELF magic
        data.extend_from_slice(&[0x7f, b'E', b'L', b'F']);

        // ELF identification
        data.push(self.ei_class.clamp(1, 2));
        data.push(self.ei_data.clamp(1, 2));
        data.push(1); // EI_VERSION
        data.push(self.ei_osabi);
        data.extend_from_slice(&[0u8; 8]); // padding

        let write_u16 = |d: &mut Vec<u8>, v: u16| {
            if is_le { d.extend_from_slice(&v.to_le_bytes()); }
            else { d.extend_from_slice(&v.to_be_bytes()); }
        };
        let write_u32 = |d: &mut Vec<u8>, v: u32| {
            if is_le { d.extend_from_slice(&v.to_le_bytes()); }
            else { d.extend_from_slice(&v.to_be_bytes()); }
        };
        let write_word = |d: &mut Vec<u8>, v: u64| {
            match (is_64bit, is_le) {
                (true, true) => d.extend_from_slice(&v.to_le_bytes()),
                (true, false) => d.extend_from_slice(&v.to_be_bytes()),
                (false, true) => d.extend_from_slice(&(v as u32).to_le_bytes()),
                (false, false) => d.extend_from_slice(&(v as u32).to_be_bytes()),
            }
        };

        // ELF header
        write_u16(&mut data, self.e_type);
        write_u16(&mut data, self.e_machine);
        write_u32(&mut data, 1); // e_version
        write_word(&mut data, 0); // e_entry
        write_word(&mut data, 0); // e_phoff
        write_word(&mut data, self.e_shoff as u64);
        write_u32(&mut data, 0); // e_flags
        write_u16(&mut data, if is_64bit { 64 } else { 52 }); // e_ehsize
        write_u16(&mut data, 0); // e_phentsize
        write_u16(&mut data, 0); // e_phnum
        write_u16(&mut data, self.e_shentsize);
        write_u16(&mut data, self.e_shnum);
        write_u16(&mut data, self.e_shstrndx);

        // Section headers, in whatever position e_shoff happens to name
        for section in &self.sections {
            write_u32(&mut data, section.sh_name);
            write_u32(&mut data, section.sh_type);
            write_word(&mut data, 0); // sh_flags
            write_word(&mut data, 0); // sh_addr
            write_word(&mut data, section.sh_offset as u64);
            write_word(&mut data, section.sh_size as u64);
            write_u32(&mut data, section.sh_link);
            write_u32(&mut data, 0); // sh_info
            write_word(&mut data, 8); // sh_addralign
            write_word(&mut data, section.sh_entsize as u64);
        }

        // Add extra data to reach various offsets
        data.extend_from_slice(&self.extra_data);

        data
    }
}

fuzz_target!(|data: &[u8]| {
    // Try structured generation
    if let Ok(fuzzed) = FuzzedElf::arbitrary(&mut Unstructured::new(data)) {
        test_elf_parsing(&fuzzed.to_bytes());
    }

    // Also test raw input
    test_elf_parsing(data);
});

fn test_elf_parsing(data: &[u8]) {
    let first = list_exported_functions_from_bytes(data);
    let second = list_exported_functions_from_bytes(data);
    assert_eq!(first.is_ok(), second.is_ok());
    if let (Ok(a), Ok(b)) = (first, second) {
        assert_eq!(a, b);
    }

    if let Ok(elf) = Elf::parse(data) {
        for section in &elf.sections {
            let _ = section.name().len();
            let _ = elf.section_data(section);
        }
        let _ = elf.dynamic_symbols().map(|t| t.map(|t| t.iter().count()));
    }
}
