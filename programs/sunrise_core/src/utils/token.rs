// sunrise_core/utils/token.rs

// external dependencies
use anchor_lang::prelude::*;
use anchor_spl::{
    token_2022::spl_token_2022::instruction::AuthorityType,
    token_interface::{
        burn, mint_to, set_authority, Burn, Mint, MintTo, SetAuthority, TokenAccount,
        TokenInterface,
    },
};

pub fn mint_tokens<'info>(
    to: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    authority: &AccountInfo<'info>,
    authority_seeds: &[&[&[u8]]],
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: authority.clone(),
            },
            authority_seeds,
        ),
        amount,
    )
}

pub fn burn_tokens<'info>(
    from: &InterfaceAccount<'info, TokenAccount>,
    amount: u64,
    mint: &InterfaceAccount<'info, Mint>,
    owner: &AccountInfo<'info>,
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    // The owner signature is carried through the beam's CPI
    burn(
        CpiContext::new(
            token_program.to_account_info(),
            Burn {
                mint: mint.to_account_info(),
                from: from.to_account_info(),
                authority: owner.clone(),
            },
        ),
        amount,
    )
}

pub fn set_mint_authority<'info>(
    mint: &InterfaceAccount<'info, Mint>,
    current_authority: &AccountInfo<'info>,
    authority_seeds: &[&[&[u8]]],
    new_authority: &Pubkey,
    token_program: &Interface<'info, TokenInterface>,
) -> Result<()> {
    set_authority(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            SetAuthority {
                current_authority: current_authority.clone(),
                account_or_mint: mint.to_account_info(),
            },
            authority_seeds,
        ),
        AuthorityType::MintTokens,
        Some(*new_authority),
    )
}
