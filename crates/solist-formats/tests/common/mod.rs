//! Synthetic ELF shared objects for tests.
//!
//! The builder lays out a minimal file: header, `.text`, `.dynstr`, the
//! symbol table, `.shstrtab`, then the section header table at the very end
//! of the file, so truncating the tail always cuts into that table.

#![allow(dead_code)]

pub const STB_LOCAL: u8 = 0;
pub const STB_GLOBAL: u8 = 1;
pub const STB_WEAK: u8 = 2;

pub const STT_NOTYPE: u8 = 0;
pub const STT_OBJECT: u8 = 1;
pub const STT_FUNC: u8 = 2;

pub const SHN_UNDEF: u16 = 0;
/// Index of `.text` in every built file.
pub const TEXT: u16 = 1;
pub const SHN_ABS: u16 = 0xfff1;

const SHT_PROGBITS: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const SHT_DYNSYM: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Little,
    Big,
}

/// One symbol to place in the table.
#[derive(Debug, Clone)]
pub struct TestSymbol {
    pub name: String,
    pub kind: u8,
    pub binding: u8,
    pub shndx: u16,
    /// Raw `st_name` to write instead of the offset of `name`.
    pub name_offset: Option<u32>,
}

impl TestSymbol {
    pub fn new(name: &str, kind: u8, binding: u8, shndx: u16) -> Self {
        Self {
            name: name.to_string(),
            kind,
            binding,
            shndx,
            name_offset: None,
        }
    }

    /// Whether the symbol is an exported function.
    pub fn is_export(&self) -> bool {
        self.kind == STT_FUNC
            && (self.binding == STB_GLOBAL || self.binding == STB_WEAK)
            && self.shndx != SHN_UNDEF
    }
}

#[derive(Debug, Clone)]
pub struct ElfBuilder {
    class: Class,
    order: Order,
    symbols: Vec<TestSymbol>,
    symbol_section: Option<&'static str>,
}

impl ElfBuilder {
    pub fn new(class: Class, order: Order) -> Self {
        Self {
            class,
            order,
            symbols: Vec::new(),
            symbol_section: Some(".dynsym"),
        }
    }

    /// A 64-bit little-endian file, the common case.
    pub fn x86_64() -> Self {
        Self::new(Class::Elf64, Order::Little)
    }

    pub fn symbol(mut self, name: &str, kind: u8, binding: u8, shndx: u16) -> Self {
        self.symbols.push(TestSymbol::new(name, kind, binding, shndx));
        self
    }

    pub fn symbols(mut self, symbols: impl IntoIterator<Item = TestSymbol>) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Adds a global function whose `st_name` is `offset`.
    pub fn function_with_name_offset(mut self, offset: u32) -> Self {
        let mut symbol = TestSymbol::new("", STT_FUNC, STB_GLOBAL, TEXT);
        symbol.name_offset = Some(offset);
        self.symbols.push(symbol);
        self
    }

    /// Emits the symbols as `.symtab` instead of `.dynsym`.
    pub fn as_symtab(mut self) -> Self {
        self.symbol_section = Some(".symtab");
        self
    }

    /// Leaves the symbol table out entirely.
    pub fn without_symbol_table(mut self) -> Self {
        self.symbol_section = None;
        self
    }

    /// Size of `.dynstr` as built.
    pub fn dynstr_len(&self) -> u32 {
        self.string_table().0.len() as u32
    }

    fn string_table(&self) -> (Vec<u8>, Vec<u32>) {
        let mut table = vec![0u8];
        let mut offsets = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            match symbol.name_offset {
                Some(offset) => offsets.push(offset),
                None => {
                    offsets.push(table.len() as u32);
                    table.extend_from_slice(symbol.name.as_bytes());
                    table.push(0);
                }
            }
        }
        (table, offsets)
    }

    pub fn build(&self) -> Vec<u8> {
        let (dynstr, name_offsets) = self.string_table();

        let mut symtab = Bytes::new(self.class, self.order);
        symtab.symbol(0, 0, 0, 0, 0);
        for (i, (symbol, name)) in self.symbols.iter().zip(&name_offsets).enumerate() {
            let value = if symbol.shndx == SHN_UNDEF {
                0
            } else {
                0x1000 + 0x10 * i as u64
            };
            let info = (symbol.binding << 4) | (symbol.kind & 0xf);
            symtab.symbol(*name, value, 8, info, symbol.shndx);
        }

        let mut sections = vec![
            SectionLayout::new(".text", SHT_PROGBITS, vec![0xc3; 32]),
            SectionLayout::new(".dynstr", SHT_STRTAB, dynstr),
        ];
        if let Some(name) = self.symbol_section {
            let sh_type = if name == ".symtab" { SHT_SYMTAB } else { SHT_DYNSYM };
            let mut layout = SectionLayout::new(name, sh_type, symtab.buf);
            layout.link = 2;
            layout.info = 1;
            layout.entsize = self.symbol_size() as u64;
            sections.push(layout);
        }

        let mut shstrtab = vec![0u8];
        let mut section_names = Vec::new();
        for layout in &sections {
            section_names.push(shstrtab.len() as u32);
            shstrtab.extend_from_slice(layout.name.as_bytes());
            shstrtab.push(0);
        }
        section_names.push(shstrtab.len() as u32);
        shstrtab.extend_from_slice(b".shstrtab\0");
        sections.push(SectionLayout::new(".shstrtab", SHT_STRTAB, shstrtab));

        let mut file = Bytes::new(self.class, self.order);
        file.buf.resize(self.header_size(), 0);
        let mut offsets = Vec::with_capacity(sections.len());
        for layout in &sections {
            file.align(8);
            offsets.push(file.buf.len() as u64);
            file.buf.extend_from_slice(&layout.data);
        }
        file.align(8);
        let shoff = file.buf.len() as u64;

        // Null section header, then one per section
        let mut headers = Bytes::new(self.class, self.order);
        headers.section_header(0, 0, 0, 0, 0, 0, 0);
        for ((layout, offset), name) in sections.iter().zip(&offsets).zip(&section_names) {
            headers.section_header(
                *name,
                layout.sh_type,
                *offset,
                layout.data.len() as u64,
                layout.link,
                layout.info,
                layout.entsize,
            );
        }
        file.buf.extend_from_slice(&headers.buf);

        let section_count = sections.len() as u16 + 1;
        let mut header = Bytes::new(self.class, self.order);
        header.file_header(shoff, self.section_header_size(), section_count, section_count - 1);
        file.buf[..header.buf.len()].copy_from_slice(&header.buf);

        file.buf
    }

    fn header_size(&self) -> usize {
        match self.class {
            Class::Elf32 => 52,
            Class::Elf64 => 64,
        }
    }

    fn section_header_size(&self) -> u16 {
        match self.class {
            Class::Elf32 => 40,
            Class::Elf64 => 64,
        }
    }

    fn symbol_size(&self) -> usize {
        match self.class {
            Class::Elf32 => 16,
            Class::Elf64 => 24,
        }
    }
}

struct SectionLayout {
    name: &'static str,
    sh_type: u32,
    data: Vec<u8>,
    link: u32,
    info: u32,
    entsize: u64,
}

impl SectionLayout {
    fn new(name: &'static str, sh_type: u32, data: Vec<u8>) -> Self {
        Self {
            name,
            sh_type,
            data,
            link: 0,
            info: 0,
            entsize: 0,
        }
    }
}

struct Bytes {
    buf: Vec<u8>,
    class: Class,
    order: Order,
}

impl Bytes {
    fn new(class: Class, order: Order) -> Self {
        Self {
            buf: Vec::new(),
            class,
            order,
        }
    }

    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn u16(&mut self, value: u16) {
        match self.order {
            Order::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
            Order::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn u32(&mut self, value: u32) {
        match self.order {
            Order::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
            Order::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    fn u64(&mut self, value: u64) {
        match self.order {
            Order::Little => self.buf.extend_from_slice(&value.to_le_bytes()),
            Order::Big => self.buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    /// Address-sized field.
    fn word(&mut self, value: u64) {
        match self.class {
            Class::Elf32 => self.u32(value as u32),
            Class::Elf64 => self.u64(value),
        }
    }

    fn align(&mut self, alignment: usize) {
        while self.buf.len() % alignment != 0 {
            self.buf.push(0);
        }
    }

    fn file_header(&mut self, shoff: u64, shentsize: u16, shnum: u16, shstrndx: u16) {
        self.buf.extend_from_slice(&[0x7f, b'E', b'L', b'F']);
        self.u8(match self.class {
            Class::Elf32 => 1,
            Class::Elf64 => 2,
        });
        self.u8(match self.order {
            Order::Little => 1,
            Order::Big => 2,
        });
        self.u8(1);
        self.u8(0);
        self.buf.extend_from_slice(&[0u8; 8]);
        self.u16(3); // ET_DYN
        self.u16(match self.class {
            Class::Elf32 => 3,
            Class::Elf64 => 62,
        });
        self.u32(1);
        self.word(0); // e_entry
        self.word(0); // e_phoff
        self.word(shoff);
        self.u32(0);
        self.u16(match self.class {
            Class::Elf32 => 52,
            Class::Elf64 => 64,
        });
        self.u16(0);
        self.u16(0);
        self.u16(shentsize);
        self.u16(shnum);
        self.u16(shstrndx);
    }

    #[allow(clippy::too_many_arguments)]
    fn section_header(
        &mut self,
        name: u32,
        sh_type: u32,
        offset: u64,
        size: u64,
        link: u32,
        info: u32,
        entsize: u64,
    ) {
        self.u32(name);
        self.u32(sh_type);
        self.word(0); // sh_flags
        self.word(0); // sh_addr
        self.word(offset);
        self.word(size);
        self.u32(link);
        self.u32(info);
        self.word(if sh_type == 0 { 0 } else { 8 });
        self.word(entsize);
    }

    fn symbol(&mut self, name: u32, value: u64, size: u64, info: u8, shndx: u16) {
        match self.class {
            Class::Elf32 => {
                self.u32(name);
                self.u32(value as u32);
                self.u32(size as u32);
                self.u8(info);
                self.u8(0);
                self.u16(shndx);
            }
            Class::Elf64 => {
                self.u32(name);
                self.u8(info);
                self.u8(0);
                self.u16(shndx);
                self.u64(value);
                self.u64(size);
            }
        }
    }
}
