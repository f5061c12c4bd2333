pub(crate) mod avx2;

pub(crate) use avx2::Avx2Isa;
